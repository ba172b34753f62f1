use clap::Parser;
use preimage::error::Error;
use preimage::logging;
use preimage::machine::Program;
use preimage::reverse_search::join_digits;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

type Result<T, E = Error> = core::result::Result<T, E>;

/// Run a program from a known (or random) register A and print what it
/// emits, so the output can be fed back to `preimage solve --target`.
#[derive(Parser)]
#[command(name = "generate-target")]
struct Cli {
    puzzle: PathBuf,
    /// Register A to start from. Random if omitted.
    #[arg(short)]
    a: Option<u128>,
    /// Number of 3-bit digits in a random register A.
    #[arg(short, long, default_value_t = 16)]
    digits: u32,
    /// Seed for the random register A, for reproducible output.
    #[arg(long)]
    rng_seed: Option<u64>,
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: u64,
}

fn main() -> Result<()> {
    logging::init();
    let args = Cli::parse();
    let program = Program::from_file(&args.puzzle)?;

    let a = match args.a {
        Some(a) => a,
        None => {
            if args.digits == 0 || args.digits > 42 {
                return Err(Error::from(format!("digits must be in 1..=42, got {}", args.digits)));
            }
            let mut rng = match args.rng_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            // top digit non-zero so the program emits exactly `digits` words
            let low = 1u128 << (3 * (args.digits - 1));
            let high = 1u128 << (3 * args.digits);
            rng.gen_range(low..high)
        }
    };

    let out = program.run_with_a(a, args.max_steps)?;
    println!("# Target generated from register A: {}", a);
    println!("{}", join_digits(&out));
    Ok(())
}
