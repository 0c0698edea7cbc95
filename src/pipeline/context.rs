//! Channels and handles wiring the pipeline stages together.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::lifecycle::Lifecycle;
use crate::types::{PageRecord, ResultRecord};

/// The two bounded hops. The parser gets `page_tx`; workers clone `page_rx`
/// and `result_tx`; the writer takes `result_rx`.
pub struct PipelineChannels {
    pub page_tx: Sender<PageRecord>,
    pub page_rx: Receiver<PageRecord>,
    pub result_tx: Sender<ResultRecord>,
    pub result_rx: Receiver<ResultRecord>,
}

/// Both queues share one capacity. Blocking sends on full queues are the
/// pipeline's only backpressure: resident records never exceed twice the
/// capacity, whatever the dump size.
pub fn create_pipeline_channels(queue_cap: usize) -> PipelineChannels {
    let (page_tx, page_rx) = bounded::<PageRecord>(queue_cap);
    let (result_tx, result_rx) = bounded::<ResultRecord>(queue_cap);
    PipelineChannels {
        page_tx,
        page_rx,
        result_tx,
        result_rx,
    }
}

/// What the parser thread reports when it exits.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOutcome {
    /// Records handed to the work queue.
    pub pages_sent: usize,
    /// The stream failed before EOF (truncated or unreadable input).
    pub truncated: bool,
}

/// Handles for a running pipeline. Join order matters: parser, then
/// workers, then writer; each join marks a drain boundary.
pub struct PipelineHandles {
    pub parse_handle: JoinHandle<ParseOutcome>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub writer_handle: JoinHandle<usize>,
    pub lifecycle: Arc<Lifecycle>,
    /// First fatal output error, set by the writer.
    pub first_error: Arc<Mutex<Option<String>>>,
}
