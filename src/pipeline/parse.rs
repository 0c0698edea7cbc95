//! Parser stage: one thread driving the page stream into the work queue.

use crossbeam_channel::Sender;
use log::{debug, error};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::ParseOutcome;
use super::lifecycle::Lifecycle;
use crate::dump::{DumpError, PageStream};
use crate::types::PageRecord;

pub fn spawn_parse_thread(
    stream: PageStream,
    page_tx: Sender<PageRecord>,
    lifecycle: Arc<Lifecycle>,
) -> JoinHandle<ParseOutcome> {
    thread::spawn(move || run_parse_loop(stream, page_tx, &lifecycle))
}

/// Feed `pages` into the work queue. A send blocks while the queue is full;
/// that stall propagates back into the decompressor read and is what bounds
/// memory. Stops between pages on abort, and on the first stream error
/// (recording it as truncation). Dropping `page_tx` on return closes the
/// work queue, which is the workers' signal to finish up.
pub fn run_parse_loop<I>(pages: I, page_tx: Sender<PageRecord>, lifecycle: &Lifecycle) -> ParseOutcome
where
    I: IntoIterator<Item = Result<PageRecord, DumpError>>,
{
    let mut outcome = ParseOutcome::default();
    for item in pages {
        if lifecycle.aborted() {
            debug!("parser: abort observed after {} pages", outcome.pages_sent);
            break;
        }
        match item {
            Ok(page) => {
                // All receivers gone means downstream already shut down.
                if page_tx.send(page).is_err() {
                    break;
                }
                outcome.pages_sent += 1;
            }
            Err(err) => {
                error!("dump stream failed after {} pages: {err}", outcome.pages_sent);
                outcome.truncated = true;
                break;
            }
        }
    }
    drop(page_tx);
    outcome
}
