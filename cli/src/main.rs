mod check;
mod search;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use pincrack_core::{DEFAULT_BATCH_END, DEFAULT_FIELD_BOUND, DEFAULT_GROUP_SIZE};

use check::check;
use search::search;

/// GPU-accelerated exhaustive search over the identity number space.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Search(Search),
    Check(Check),
}

/// All the compute backends supported.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum AvailableBackend {
    Cuda,
    #[default]
    Wgpu,
    /// Evaluate the predicate on the host (not recommended, unless no
    /// compatible device is available).
    Cpu,
}

/// Search the whole candidate space and store every valid number found.
#[derive(Args)]
pub struct Search {
    /// The file where matches are written, one line per batch.
    #[clap(value_parser)]
    output: PathBuf,

    /// The number of values of the day field.
    #[clap(long, value_parser = value_parser!(u32).range(1..=100), default_value_t = DEFAULT_FIELD_BOUND)]
    days: u32,

    /// The number of values of the month field.
    #[clap(long, value_parser = value_parser!(u32).range(1..=100), default_value_t = DEFAULT_FIELD_BOUND)]
    months: u32,

    /// The number of values of the year field.
    #[clap(long, value_parser = value_parser!(u32).range(1..=100), default_value_t = DEFAULT_FIELD_BOUND)]
    years: u32,

    /// The first batch index to search.
    #[clap(long, default_value_t = 0)]
    batch_start: u32,

    /// The last batch index to search, inclusive.
    #[clap(long, default_value_t = DEFAULT_BATCH_END)]
    batch_end: u32,

    /// The thread group size used on the accelerator.
    #[clap(short, long, value_parser = value_parser!(u32).range(1..=1024), default_value_t = DEFAULT_GROUP_SIZE)]
    group_size: u32,

    /// The compute backend running the verdict kernel.
    #[clap(short, long, value_enum, default_value_t = AvailableBackend::default())]
    backend: AvailableBackend,
}

/// Check a single number against the validity predicate, on the CPU.
#[derive(Args)]
pub struct Check {
    /// The ten-digit number to check. A separating dash is accepted.
    #[clap(value_parser = check_number)]
    number: String,
}

/// Checks that the number is made of ten digits, ignoring a dash separator.
fn check_number(number: &str) -> Result<String> {
    let digits: String = number.chars().filter(|c| *c != '-').collect();

    if digits.len() != 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        bail!("The number must be made of exactly ten digits");
    }

    Ok(digits)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.commands {
        Commands::Search(args) => search(args)?,
        Commands::Check(args) => check(args)?,
    }

    Ok(())
}
