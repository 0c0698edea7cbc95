//! Worker pool: filter pages by title and apply the run mode's transform.

use crossbeam_channel::{Receiver, Sender};
use log::warn;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::lifecycle::Lifecycle;
use crate::filter::TitleSet;
use crate::transform;
use crate::types::{PageRecord, ResultRecord, RunMode};

/// Process one page. `None` when the title misses the filter, or when the
/// transform fails (logged; the pool keeps going, one bad page never stops
/// a worker). At most one result per page.
pub fn page_to_result(page: PageRecord, titles: &TitleSet, mode: RunMode) -> Option<ResultRecord> {
    if !titles.contains(&page.title) {
        return None;
    }
    match mode {
        RunMode::Grab { fulltext } => {
            match transform::transform_text(&page.title, &page.text, fulltext) {
                Ok(text) => Some(ResultRecord::Text {
                    page: page.title,
                    text,
                }),
                Err(err) => {
                    warn!("transform failed for {:?}, dropping page: {err:#}", page.title);
                    None
                }
            }
        }
        RunMode::Redirects => {
            let actual_page = page.redirect.unwrap_or_else(|| page.title.clone());
            Some(ResultRecord::Redirect {
                page: page.title,
                actual_page,
            })
        }
    }
}

/// One worker: pull until the work queue closes, or an abort lands between
/// items. Blocks only on the two queues.
fn transform_worker_loop(
    page_rx: Receiver<PageRecord>,
    result_tx: Sender<ResultRecord>,
    titles: Arc<TitleSet>,
    mode: RunMode,
    lifecycle: Arc<Lifecycle>,
) {
    while let Ok(page) = page_rx.recv() {
        if lifecycle.aborted() {
            break;
        }
        if let Some(result) = page_to_result(page, &titles, mode)
            && result_tx.send(result).is_err()
        {
            break;
        }
    }
    drop(result_tx);
}

/// Spawn the pool. The caller must drop its own `result_tx` clone after this
/// so the result queue closes once the last worker exits.
pub fn spawn_transform_workers(
    page_rx: Receiver<PageRecord>,
    result_tx: &Sender<ResultRecord>,
    titles: &Arc<TitleSet>,
    mode: RunMode,
    lifecycle: &Arc<Lifecycle>,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let page_rx = page_rx.clone();
            let result_tx = result_tx.clone();
            let titles = Arc::clone(titles);
            let lifecycle = Arc::clone(lifecycle);
            thread::spawn(move || transform_worker_loop(page_rx, result_tx, titles, mode, lifecycle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(names: &[&str]) -> TitleSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn page(title: &str, text: &str, redirect: Option<&str>) -> PageRecord {
        PageRecord {
            title: title.to_string(),
            text: text.to_string(),
            redirect: redirect.map(String::from),
        }
    }

    #[test]
    fn filter_miss_drops_page() {
        let set = titles(&["Cat"]);
        let out = page_to_result(page("Dog", "body", None), &set, RunMode::Redirects);
        assert!(out.is_none());
    }

    #[test]
    fn grab_mode_transforms_text() {
        let set = titles(&["Cat"]);
        let out = page_to_result(
            page("Cat", "'''Cats''' are mammals.", None),
            &set,
            RunMode::Grab { fulltext: false },
        );
        assert_eq!(
            out,
            Some(ResultRecord::Text {
                page: "Cat".to_string(),
                text: "Cats are mammals.".to_string(),
            })
        );
    }

    #[test]
    fn redirect_mode_resolves_target() {
        let set = titles(&["Dog"]);
        let out = page_to_result(
            page("Dog", "", Some("Canine")),
            &set,
            RunMode::Redirects,
        );
        assert_eq!(
            out,
            Some(ResultRecord::Redirect {
                page: "Dog".to_string(),
                actual_page: "Canine".to_string(),
            })
        );
    }

    #[test]
    fn redirect_mode_self_references_without_target() {
        let set = titles(&["Cat"]);
        let out = page_to_result(page("Cat", "body", None), &set, RunMode::Redirects);
        assert_eq!(
            out,
            Some(ResultRecord::Redirect {
                page: "Cat".to_string(),
                actual_page: "Cat".to_string(),
            })
        );
    }
}
