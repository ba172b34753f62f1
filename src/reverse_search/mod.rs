pub mod search;
pub mod select;
pub mod target;

use crate::config::{EvaluatorConfig, SearchConfig, Selection};
use crate::error::Error;
use crate::evaluator::{MachineStep, TransitionEvaluator, XorShiftStep};
use crate::machine::{Machine, Program};
use crate::types::{Accumulator, Digit, Radix};
use search::{CandidateSet, LevelStats, SearchOptions};
use serde::Serialize;
use target::TargetSequence;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub target: Vec<Digit>,
    pub radix: Radix,
    pub candidates: CandidateSet,
    pub selection: Selection,
    pub selected: Vec<Accumulator>,
    /// Whether the selected seeds were confirmed by running the whole
    /// program. `None` when there was no program to run.
    pub verified: Option<bool>,
    pub levels: Vec<LevelStats>,
}

pub fn build_evaluator(
    config: &SearchConfig,
    program: Option<&Program>,
) -> Result<Box<dyn TransitionEvaluator>, Error> {
    Ok(match config.evaluator {
        EvaluatorConfig::Machine => {
            let program = program.ok_or_else(|| {
                Error::from("the machine evaluator needs a program to interpret".to_string())
            })?;
            Box::new(MachineStep::from_program(program)?)
        }
        EvaluatorConfig::XorShift { first_mask, second_mask } => {
            Box::new(XorShiftStep { first_mask, second_mask })
        }
    })
}

/// Search for seeds of `program` (if given) that emit `target`, which
/// defaults to the program's own words.
pub fn find_seeds(
    program: Option<&Program>,
    target: Option<Vec<Digit>>,
    config: &SearchConfig,
) -> Result<SearchReport, Error> {
    let evaluator = build_evaluator(config, program)?;
    let radix = match evaluator.radix() {
        Some(radix) if radix != config.radix => {
            return Err(Error::RadixMismatch {
                target: config.radix,
                evaluator: radix,
            })
        }
        Some(radix) => radix,
        None => config.radix,
    };

    let digits = match (target, program) {
        (Some(digits), _) => digits,
        (None, Some(program)) => program.words_as_digits(),
        (None, None) => return Err(Error::from("no target sequence given".to_string())),
    };
    let target = TargetSequence::new(digits, radix)?;

    let options = SearchOptions {
        max_candidates: config.max_candidates,
        parallel: config.parallel,
    };
    let (candidates, levels) = search::solve_traced(&target, evaluator.as_ref(), &options)?;

    let (selected, verified) = match (program, config.selection) {
        (Some(program), Selection::Minimum) => {
            let verify = |a: Accumulator| -> Result<bool, Error> {
                let matches = Machine::with_a(program, a).run_expecting(target.digits(), config.max_steps)?;
                if !matches {
                    warn!(seed = %a, "candidate does not reproduce the target when run in full");
                }
                Ok(matches)
            };
            let found = select::select_verified_minimum(&candidates, verify)?;
            let verified = !candidates.is_empty() && found.is_some();
            (found.into_iter().collect(), Some(verified))
        }
        (_, selection) => (select::select(&candidates, selection), None),
    };

    Ok(SearchReport {
        target: target.digits().to_vec(),
        radix,
        candidates,
        selection: config.selection,
        selected,
        verified,
        levels,
    })
}

pub fn print_report(report: &SearchReport) {
    println!(
        "Target: {} ({} digits, radix {})",
        join_digits(&report.target),
        report.target.len(),
        report.radix
    );
    for stats in &report.levels {
        println!(
            "  Level {:>3}: digit {} kept {} of {}",
            stats.level, stats.digit, stats.retained, stats.examined
        );
    }

    if report.candidates.is_empty() {
        println!("No seed reproduces this sequence");
        return;
    }
    println!("Found {} candidate seed(s)", report.candidates.len());
    match report.verified {
        Some(false) => println!("No candidate reproduces the target when the program is run in full"),
        _ => {
            for (i, seed) in report.selected.iter().enumerate() {
                println!("  {} {}: {}", report.selection, i + 1, seed);
            }
        }
    }
}

pub fn join_digits<T: ToString>(digits: &[T]) -> String {
    digits.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",")
}
