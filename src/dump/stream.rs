//! Incremental page state machine over the dump's XML event stream.
//!
//! Mirrors the document structure with a stack of open tracked elements and
//! per-page accumulators; one [`PageRecord`] comes out per `</page>` whose
//! title and text both completed and whose namespace passes the predicate.

use quick_xml::events::{BytesStart, Event};
use std::path::Path;

use super::{DumpError, DumpReader};
use crate::types::PageRecord;

/// Namespace predicate. Receives `None` when no `<ns>` closed inside the
/// page; rejecting `None` is what silently drops namespace-less pages.
pub type NsFilter = Box<dyn Fn(Option<i32>) -> bool + Send>;

/// Elements whose character content we accumulate. Only these go on the
/// open-element stack; everything else leaves the stack alone, so stray
/// character data between known tags routes to whichever tracked element
/// is still open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tracked {
    Page,
    Title,
    Text,
    Ns,
}

impl Tracked {
    fn from_name(name: &[u8]) -> Option<Tracked> {
        match name {
            b"page" => Some(Tracked::Page),
            b"title" => Some(Tracked::Title),
            b"text" => Some(Tracked::Text),
            b"ns" => Some(Tracked::Ns),
            _ => None,
        }
    }
}

/// Lazy, finite, non-restartable sequence of pages in document order.
/// Pull records via [`Iterator`]; the whole document tree is never
/// materialized.
pub struct PageStream {
    reader: DumpReader,
    filter: NsFilter,
    stack: Vec<Tracked>,
    title: Option<String>,
    text: Option<String>,
    redirect: Option<String>,
    ns_buf: String,
    namespace: Option<i32>,
    done: bool,
}

impl PageStream {
    pub fn new(reader: DumpReader, filter: NsFilter) -> Self {
        Self {
            reader,
            filter,
            stack: Vec::new(),
            title: None,
            text: None,
            redirect: None,
            ns_buf: String::new(),
            namespace: None,
            done: false,
        }
    }

    /// Open a dump file with an arbitrary namespace predicate.
    pub fn open(path: &Path, filter: NsFilter) -> Result<Self, DumpError> {
        Ok(Self::new(DumpReader::open(path)?, filter))
    }

    /// Open a dump file keeping only ordinary content pages (namespace 0).
    pub fn articles(path: &Path) -> Result<Self, DumpError> {
        Self::open(path, Box::new(|ns| ns == Some(0)))
    }

    /// Parse an in-memory XML buffer (tests and small fixtures).
    pub fn from_xml(xml: impl Into<Vec<u8>>, filter: NsFilter) -> Self {
        Self::new(DumpReader::from_bytes(xml), filter)
    }

    /// Advance the event loop until the next emitted page or EOF.
    fn next_page(&mut self) -> Result<Option<PageRecord>, DumpError> {
        let mut buf = Vec::with_capacity(8 * 1024);
        loop {
            match self.reader.read_event(&mut buf)? {
                Event::Start(e) => self.on_open(&e, false),
                Event::Empty(e) => self.on_open(&e, true),
                Event::Text(e) => {
                    if let Ok(content) = e.unescape() {
                        self.on_chars(&content);
                    }
                }
                Event::CData(e) => {
                    let content = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    self.on_chars(&content);
                }
                Event::End(e) => {
                    if let Some(record) = self.on_close(e.name().as_ref()) {
                        return Ok(Some(record));
                    }
                }
                Event::Eof => {
                    if !self.stack.is_empty() {
                        return Err(DumpError::Truncated);
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn on_open(&mut self, e: &BytesStart<'_>, self_closing: bool) {
        match e.name().as_ref() {
            b"page" => {
                self.title = None;
                self.text = None;
                self.redirect = None;
                self.namespace = None;
                self.ns_buf.clear();
                if !self_closing {
                    self.stack.push(Tracked::Page);
                }
            }
            b"title" => {
                self.title = Some(String::new());
                if !self_closing {
                    self.stack.push(Tracked::Title);
                }
            }
            b"text" => {
                // Empty pages ship as a self-closing <text/>; the field still
                // counts as seen, with empty content.
                self.text = Some(String::new());
                if !self_closing {
                    self.stack.push(Tracked::Text);
                }
            }
            b"ns" => {
                self.namespace = None;
                self.ns_buf.clear();
                if !self_closing {
                    self.stack.push(Tracked::Ns);
                }
            }
            // The target lives in the attribute, and the element is
            // self-closing in real dumps; it never joins the stack.
            b"redirect" => self.redirect = redirect_target(e),
            _ => {}
        }
    }

    /// Route character content to the tracked element on top of the stack.
    /// With nothing open there is no field to attribute it to; discard.
    fn on_chars(&mut self, content: &str) {
        match self.stack.last() {
            Some(Tracked::Title) => {
                if let Some(title) = self.title.as_mut() {
                    title.push_str(content);
                }
            }
            Some(Tracked::Text) => {
                if let Some(text) = self.text.as_mut() {
                    text.push_str(content);
                }
            }
            Some(Tracked::Ns) => self.ns_buf.push_str(content),
            Some(Tracked::Page) | None => {}
        }
    }

    fn on_close(&mut self, name: &[u8]) -> Option<PageRecord> {
        if let Some(tag) = Tracked::from_name(name)
            && self.stack.last() == Some(&tag)
        {
            self.stack.pop();
        }
        match name {
            b"ns" => {
                self.namespace = self.ns_buf.trim().parse().ok();
                None
            }
            b"page" => self.finish_page(),
            _ => None,
        }
    }

    /// Emit the accumulated page if it qualifies. A page whose text element
    /// never appeared, whose title is missing or empty, or whose namespace
    /// fails the predicate produces nothing.
    fn finish_page(&mut self) -> Option<PageRecord> {
        let title = self.title.take();
        let text = self.text.take();
        let redirect = self.redirect.take();
        if !(self.filter)(self.namespace) {
            return None;
        }
        match (title, text) {
            (Some(title), Some(text)) if !title.is_empty() => Some(PageRecord {
                title,
                text,
                redirect,
            }),
            _ => None,
        }
    }
}

fn redirect_target(e: &BytesStart<'_>) -> Option<String> {
    e.try_get_attribute("title")
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

impl Iterator for PageStream {
    type Item = Result<PageRecord, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_page() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
