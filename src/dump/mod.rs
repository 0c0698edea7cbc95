//! Dump input layer: decompressing reader and the page state machine.

pub mod reader;
pub mod stream;

pub use reader::DumpReader;
pub use stream::{NsFilter, PageStream};

use thiserror::Error;

/// Stream-level failures from the dump input layer. Page-level malformations
/// (missing namespace, absent text element) are not errors; those pages are
/// dropped and parsing continues.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to read dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML in dump: {0}")]
    Xml(#[from] quick_xml::Error),

    /// EOF arrived with elements still open: the compressed stream was cut
    /// short or the decoder gave up partway.
    #[error("dump stream ended inside a page element")]
    Truncated,
}
