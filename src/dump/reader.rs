//! Reader abstraction over the supported dump encodings.

use bzip2::read::BzDecoder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use super::DumpError;

/// Decompression buffer in front of the XML reader. Dump pages run to
/// megabytes of wikitext, so a small default buffer thrashes the decoder.
const READ_BUF_SIZE: usize = 1024 * 1024;

/// quick-xml reader over the input encodings this tool accepts.
pub enum DumpReader {
    /// bzip2-compressed dump file (`.xml.bz2`), the format dumps ship in.
    Bzip2(Reader<BufReader<BzDecoder<File>>>),
    /// Uncompressed XML file.
    Plain(Reader<BufReader<File>>),
    /// In-memory XML, for tests and small fixtures.
    Memory(Reader<Cursor<Vec<u8>>>),
}

impl DumpReader {
    /// Open a dump file, picking the decoder from the extension.
    pub fn open(path: &Path) -> Result<Self, DumpError> {
        let file = File::open(path)?;
        let is_bz2 = path.extension().map(|e| e == "bz2").unwrap_or(false);
        Ok(if is_bz2 {
            let decoder = BzDecoder::new(file);
            DumpReader::Bzip2(Reader::from_reader(BufReader::with_capacity(
                READ_BUF_SIZE,
                decoder,
            )))
        } else {
            DumpReader::Plain(Reader::from_reader(BufReader::with_capacity(
                READ_BUF_SIZE,
                file,
            )))
        })
    }

    /// Read directly from an XML byte buffer.
    pub fn from_bytes(xml: impl Into<Vec<u8>>) -> Self {
        DumpReader::Memory(Reader::from_reader(Cursor::new(xml.into())))
    }

    pub(crate) fn read_event<'a>(
        &mut self,
        buf: &'a mut Vec<u8>,
    ) -> Result<Event<'a>, quick_xml::Error> {
        buf.clear();
        match self {
            DumpReader::Bzip2(r) => r.read_event_into(buf),
            DumpReader::Plain(r) => r.read_event_into(buf),
            DumpReader::Memory(r) => r.read_event_into(buf),
        }
    }
}
