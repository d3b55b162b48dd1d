//! Fingerpipe CLI: fingerprint items given as arguments or on stdin.

use anyhow::Result;
use clap::Parser;
use fingerpipe::engine::arg_parser::Cli;
use fingerpipe::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
