//! Command-line arguments of `enhance-sim`.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "enhance-sim",
    version,
    about = "Run a scripted session against an enhanced page fixture",
    long_about = "Bootstraps the enhancement engine on a JSON page fixture, applies the\n\
                  scripted steps on a virtual clock and prints a JSON report."
)]
pub struct Args {
    /// Page fixture (JSON).
    #[arg(value_name = "FIXTURE")]
    pub fixture: PathBuf,

    /// Engine configuration overrides (JSON).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Steps to apply after bootstrap (JSON array).
    #[arg(long = "steps", value_name = "PATH")]
    pub steps: Option<PathBuf>,

    /// Print the report on a single line.
    #[arg(long = "compact")]
    pub compact: bool,
}
