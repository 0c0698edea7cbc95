//! Wikisieve: streaming Wikipedia dump extractor.
//!
//! Parses a bzip2-compressed XML dump in one bounded-memory pass, filters
//! pages against a title list, and fans matching pages out to a parallel
//! transform pipeline writing newline-delimited JSON.

pub mod dump;
pub mod engine;
pub mod filter;
pub mod pipeline;
pub mod transform;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::sync::Arc;

use crate::engine::progress::{create_progress_bar, progress_callback, refresh_bar};
use crate::filter::TitleSet;
use crate::pipeline::Lifecycle;

/// Result alias used by public wikisieve API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run one extraction pass over `opts.dump_path` and
/// write one JSON line per matching page to `opts.out_path`. Returns how the
/// run ended and what it counted; a truncated dump is reported as
/// [`Completion::Incomplete`], not an error.
pub fn sieve_dump(opts: &SieveOpts) -> Result<RunSummary> {
    sieve_dump_with(opts, Arc::new(Lifecycle::new()))
}

/// Like [`sieve_dump`], with a caller-owned [`Lifecycle`] so the run can be
/// observed (phase, records written) or aborted from another thread.
pub fn sieve_dump_with(opts: &SieveOpts, lifecycle: Arc<Lifecycle>) -> Result<RunSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );

    let titles = Arc::new(TitleSet::load(&opts.titles_path)?);
    debug!("loaded {} titles", titles.len());

    let bar = opts.verbose.then(|| {
        let b = create_progress_bar(titles.len(), "Sieving");
        refresh_bar(&b);
        b
    });
    let on_written = progress_callback(&bar);

    pipeline::run_extract(opts, titles, lifecycle, on_written)
}
