//! CLI command handler: build run options, hook Ctrl-C, run the pipeline.

use anyhow::{Result, anyhow};
use log::{info, warn};
use std::sync::Arc;

use crate::engine::arg_parser::{Cli, Commands};
use crate::pipeline::Lifecycle;
use crate::types::{Completion, RunMode, SieveOpts};
use crate::utils::setup_logging;

fn setup_opts(cli: &Cli) -> SieveOpts {
    let common = cli.command.common();
    setup_logging(common.verbose);
    let mode = match &cli.command {
        Commands::Grab { fulltext, .. } => RunMode::Grab {
            fulltext: *fulltext,
        },
        Commands::Redirects { .. } => RunMode::Redirects,
    };
    SieveOpts {
        dump_path: common.dump.clone(),
        titles_path: common.titles.clone(),
        out_path: common.out.clone(),
        mode,
        num_workers: common.workers,
        queue_cap: common.queue_cap,
        verbose: common.verbose,
    }
}

/// Run the selected mode. Ctrl-C aborts early: queued pages are discarded,
/// in-flight items finish, and the output keeps whatever was written.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli);
    let lifecycle = Arc::new(Lifecycle::new());
    let interrupt = Arc::clone(&lifecycle);
    ctrlc::set_handler(move || {
        interrupt.request_abort();
    })?;

    let summary = crate::sieve_dump_with(&opts, lifecycle)?;
    match summary.completion {
        Completion::Success => {
            info!(
                "done: {} pages parsed, {} records written",
                summary.pages_parsed, summary.records_written
            );
            Ok(())
        }
        Completion::Aborted => {
            warn!(
                "aborted: {} records written before shutdown",
                summary.records_written
            );
            Ok(())
        }
        Completion::Incomplete => Err(anyhow!(
            "dump ended prematurely; output holds {} records from a partial parse",
            summary.records_written
        )),
    }
}
