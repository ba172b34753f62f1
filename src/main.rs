use clap::{Parser, Subcommand, ValueEnum};
use preimage::config::{EvaluatorConfig, SearchConfig, Selection};
use preimage::error::Error;
use preimage::evaluator::XorShiftStep;
use preimage::logging;
use preimage::machine::{Machine, Program};
use preimage::reverse_search::{self, target::parse_digits};
use std::path::PathBuf;

type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Parser)]
#[command(name = "preimage", version, about = "Find the seeds that make a program emit a given sequence")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum EvaluatorKind {
    Machine,
    XorShift,
}

#[derive(Subcommand)]
enum Command {
    /// Search for register A values that reproduce a target sequence.
    Solve {
        /// Puzzle input with registers and program.
        puzzle: Option<PathBuf>,
        /// Comma-separated target digits. Defaults to the program's own words.
        #[arg(short, long)]
        target: Option<String>,
        /// JSON search configuration; flags below override it.
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        evaluator: Option<EvaluatorKind>,
        #[arg(long)]
        first_mask: Option<u32>,
        #[arg(long)]
        second_mask: Option<u32>,
        #[arg(short, long)]
        radix: Option<u32>,
        #[arg(short, long)]
        max_candidates: Option<usize>,
        #[arg(short, long)]
        parallel: bool,
        #[arg(short, long)]
        select: Option<Selection>,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Run the program forward and print what it emits.
    Run {
        puzzle: PathBuf,
        /// Override register A.
        #[arg(short)]
        a: Option<u128>,
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: u64,
    },
}

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    match Cli::parse().command {
        Command::Solve {
            puzzle,
            target,
            config,
            evaluator,
            first_mask,
            second_mask,
            radix,
            max_candidates,
            parallel,
            select,
            json,
        } => {
            let mut search_config = match config {
                Some(path) => SearchConfig::from_file(&path)?,
                None => SearchConfig::default(),
            };
            if let Some(kind) = evaluator {
                search_config.evaluator = match kind {
                    EvaluatorKind::Machine => EvaluatorConfig::Machine,
                    EvaluatorKind::XorShift => {
                        let step = XorShiftStep::default();
                        EvaluatorConfig::XorShift {
                            first_mask: step.first_mask,
                            second_mask: step.second_mask,
                        }
                    }
                };
            }
            search_config.override_masks(first_mask, second_mask)?;
            if let Some(radix) = radix {
                search_config.radix = radix;
            }
            if max_candidates.is_some() {
                search_config.max_candidates = max_candidates;
            }
            search_config.parallel |= parallel;
            if let Some(selection) = select {
                search_config.selection = selection;
            }

            let program = puzzle.as_deref().map(Program::from_file).transpose()?;
            let target = target.as_deref().map(parse_digits).transpose()?;
            let report = reverse_search::find_seeds(program.as_ref(), target, &search_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                reverse_search::print_report(&report);
            }
            Ok(())
        }
        Command::Run { puzzle, a, max_steps } => {
            let program = Program::from_file(&puzzle)?;
            let mut machine = match a {
                Some(a) => Machine::with_a(&program, a),
                None => Machine::new(&program),
            };
            let out = machine.run(max_steps)?;
            println!("{}", reverse_search::join_digits(&out));
            Ok(())
        }
    }
}
