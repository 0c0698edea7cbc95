//! Run coordinator: starts every stage, joins them in dependency order, and
//! advances the lifecycle phase at each drain boundary.

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::fs::File;
use std::io::BufWriter;
use std::sync::{Arc, Mutex};

use super::context::{PipelineHandles, create_pipeline_channels};
use super::lifecycle::{Lifecycle, Phase};
use super::parse::spawn_parse_thread;
use super::workers::spawn_transform_workers;
use super::writer::{OnWritten, spawn_writer_thread};
use crate::dump::PageStream;
use crate::filter::TitleSet;
use crate::types::{Completion, RunSummary, SieveOpts};
use crate::utils::config::{DEFAULT_QUEUE_CAP, default_worker_count};

/// Open input and output, then start parser, worker pool and writer. Both
/// opens happen before any thread spawns, so an unopenable dump or output
/// path fails the run before data flows.
pub fn run_pipeline(
    opts: &SieveOpts,
    titles: Arc<TitleSet>,
    lifecycle: Arc<Lifecycle>,
    on_written: Option<OnWritten>,
) -> Result<PipelineHandles> {
    let stream = PageStream::articles(&opts.dump_path)
        .with_context(|| format!("failed to open dump {}", opts.dump_path.display()))?;
    let out = File::create(&opts.out_path)
        .with_context(|| format!("failed to open output file {}", opts.out_path.display()))?;

    let num_workers = opts.num_workers.unwrap_or_else(default_worker_count).max(1);
    let queue_cap = opts.queue_cap.unwrap_or(DEFAULT_QUEUE_CAP).max(1);
    debug!("pipeline: {num_workers} workers, queue capacity {queue_cap}");

    let channels = create_pipeline_channels(queue_cap);
    let first_error: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));

    let worker_handles = spawn_transform_workers(
        channels.page_rx,
        &channels.result_tx,
        &titles,
        opts.mode,
        &lifecycle,
        num_workers,
    );
    // Workers now hold the only result senders; the queue closes when the
    // last of them exits.
    drop(channels.result_tx);
    let writer_handle = spawn_writer_thread(
        channels.result_rx,
        BufWriter::new(out),
        Arc::clone(&lifecycle),
        Arc::clone(&first_error),
        on_written,
    );
    // Parser last: the whole pool and the writer are standing by before the
    // first record flows.
    let parse_handle = spawn_parse_thread(stream, channels.page_tx, Arc::clone(&lifecycle));

    Ok(PipelineHandles {
        parse_handle,
        worker_handles,
        writer_handle,
        lifecycle,
        first_error,
    })
}

/// Run one full extraction pass and shepherd it through shutdown.
///
/// Joining the parser means the input is exhausted (or failed, or aborted);
/// joining the workers means the work queue was fully consumed with no
/// in-flight item: together the Parsing to Draining boundary. Joining the
/// writer means the result queue drained and the output was flushed and
/// closed: the Draining to ShuttingDown boundary. Every enqueued page is
/// thereby accounted for: processed into a result, or dropped by filter,
/// transform failure, or abort.
pub fn run_extract(
    opts: &SieveOpts,
    titles: Arc<TitleSet>,
    lifecycle: Arc<Lifecycle>,
    on_written: Option<OnWritten>,
) -> Result<RunSummary> {
    let handles = run_pipeline(opts, titles, Arc::clone(&lifecycle), on_written)?;

    let parse_outcome = handles
        .parse_handle
        .join()
        .map_err(|_| anyhow!("parser thread panicked"))?;
    for handle in handles.worker_handles {
        let _ = handle.join();
    }
    lifecycle.advance(Phase::Draining);

    let records_written = handles
        .writer_handle
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))?;
    lifecycle.advance(Phase::ShuttingDown);

    if let Some(msg) = handles.first_error.lock().unwrap().take() {
        return Err(anyhow!(msg));
    }

    let completion = if lifecycle.aborted() {
        Completion::Aborted
    } else if parse_outcome.truncated {
        Completion::Incomplete
    } else {
        Completion::Success
    };
    if completion == Completion::Incomplete {
        warn!(
            "dump ended prematurely; wrote {records_written} records from a partial parse"
        );
    }

    Ok(RunSummary {
        pages_parsed: parse_outcome.pages_sent,
        records_written,
        completion,
    })
}
