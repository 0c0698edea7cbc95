//! Public and internal types for the wikisieve API and pipeline.

use serde::Serialize;
use std::path::PathBuf;

/// One page element pulled off the dump stream. Produced by the parser for
/// every page that completed a title and a text field and passed the
/// namespace predicate; title filtering happens later, in the workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRecord {
    /// Page title, non-empty.
    pub title: String,
    /// Raw wikitext body. May be empty (redirect stubs usually are not,
    /// but empty `<text/>` elements do occur).
    pub text: String,
    /// Redirect target, present iff the page is a redirect stub.
    pub redirect: Option<String>,
}

/// One output line, shaped by the run mode.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResultRecord {
    /// grab mode: transformed article text.
    Text { page: String, text: String },
    /// redirects mode: `actual_page` is the redirect target, or the page's
    /// own title when the page is not a redirect.
    Redirect { page: String, actual_page: String },
}

impl ResultRecord {
    pub fn page(&self) -> &str {
        match self {
            ResultRecord::Text { page, .. } | ResultRecord::Redirect { page, .. } => page,
        }
    }
}

/// Which extraction the workers run. Modes are mutually exclusive per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Transform matched pages' text (lead section, or the whole article
    /// minus reference-style sections when `fulltext` is set).
    Grab { fulltext: bool },
    /// Resolve redirect stubs; no text transform involved.
    Redirects,
}

/// How the run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Input exhausted, everything drained and written.
    Success,
    /// The dump stream failed before EOF; output holds the parsed prefix.
    Incomplete,
    /// An abort was requested; queued pages were discarded.
    Aborted,
}

/// What a finished run reports back.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    /// Pages the parser handed to the work queue.
    pub pages_parsed: usize,
    /// Records the writer put on the output stream.
    pub records_written: usize,
    pub completion: Completion,
}

/// Options for one extraction run.
#[derive(Clone, Debug)]
pub struct SieveOpts {
    /// Dump file, bzip2-compressed (`.xml.bz2`) or plain XML.
    pub dump_path: PathBuf,
    /// JSON array of page titles to keep.
    pub titles_path: PathBuf,
    /// Output file; one JSON object per matching page.
    pub out_path: PathBuf,
    pub mode: RunMode,
    /// Override worker thread count. When None, available parallelism capped
    /// at [`MAX_DEFAULT_WORKERS`](crate::utils::config::MAX_DEFAULT_WORKERS).
    pub num_workers: Option<usize>,
    /// Override the capacity of the page and result queues.
    pub queue_cap: Option<usize>,
    /// Show a progress bar and debug logging.
    pub verbose: bool,
}
