//! `enhance-sim` entry point.

use anyhow::Result;
use clap::Parser as _;
use enhance_sim::cli::Args;
use enhance_sim::{Step, simulate};
use page_enhance::EnhanceConfig;
use page_host::PageFixture;
use std::io::{self, Write as _};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let fixture = PageFixture::load(&args.fixture)?;
    let config = match &args.config {
        Some(path) => EnhanceConfig::load(path)?,
        None => EnhanceConfig::default(),
    }
    .with_env_overrides();
    let steps = match &args.steps {
        Some(path) => Step::load_list(path)?,
        None => Vec::new(),
    };

    let report = simulate(&fixture, config, &steps)?;
    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
