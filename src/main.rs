//! Wikisieve CLI: extract articles or redirects from a Wikipedia dump.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use wikisieve::engine::arg_parser::Cli;
use wikisieve::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
