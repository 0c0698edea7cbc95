//! Writer stage: one record at a time onto the newline-delimited JSON output.

use crossbeam_channel::Receiver;
use log::error;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::lifecycle::Lifecycle;
use crate::types::ResultRecord;

/// Per-record progress callback, invoked with the number of records just
/// written (always 1 here; the signature matches the bar helpers).
pub type OnWritten = Box<dyn Fn(usize) + Send>;

pub fn spawn_writer_thread<W>(
    result_rx: Receiver<ResultRecord>,
    out: W,
    lifecycle: Arc<Lifecycle>,
    first_error: Arc<Mutex<Option<String>>>,
    on_written: Option<OnWritten>,
) -> JoinHandle<usize>
where
    W: Write + Send + 'static,
{
    thread::spawn(move || run_writer_loop(result_rx, out, &lifecycle, &first_error, on_written))
}

/// Serialize each record as one JSON line, in arrival order, holding only
/// the record being written. Exits when the result queue closes (normal
/// drain) or after the current record on abort. A write failure is fatal
/// for the whole run: record it, request abort so upstream stalls out, and
/// bail. Returns the number of records written.
pub fn run_writer_loop<W: Write>(
    result_rx: Receiver<ResultRecord>,
    mut out: W,
    lifecycle: &Lifecycle,
    first_error: &Mutex<Option<String>>,
    on_written: Option<OnWritten>,
) -> usize {
    let mut written = 0_usize;
    while let Ok(record) = result_rx.recv() {
        if let Err(err) = write_record(&mut out, &record) {
            error!("output write failed: {err}");
            let _ = first_error
                .lock()
                .unwrap()
                .get_or_insert_with(|| format!("output write failed: {err}"));
            lifecycle.request_abort();
            return written;
        }
        written = lifecycle.record_written();
        if let Some(cb) = on_written.as_ref() {
            cb(1);
        }
        if lifecycle.aborted() {
            break;
        }
    }
    if let Err(err) = out.flush() {
        error!("output flush failed: {err}");
        let _ = first_error
            .lock()
            .unwrap()
            .get_or_insert_with(|| format!("output flush failed: {err}"));
        lifecycle.request_abort();
    }
    written
}

fn write_record<W: Write>(out: &mut W, record: &ResultRecord) -> io::Result<()> {
    let line = serde_json::to_string(record).map_err(io::Error::from)?;
    writeln!(out, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn writes_one_json_line_per_record() {
        let (tx, rx) = bounded(4);
        tx.send(ResultRecord::Redirect {
            page: "Dog".into(),
            actual_page: "Canine".into(),
        })
        .unwrap();
        tx.send(ResultRecord::Text {
            page: "Cat".into(),
            text: "meow".into(),
        })
        .unwrap();
        drop(tx);

        let lc = Lifecycle::new();
        let errs = Mutex::new(None);
        let mut out = Vec::new();
        let written = run_writer_loop(rx, &mut out, &lc, &errs, None);

        assert_eq!(written, 2);
        assert_eq!(lc.records_written(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"{"page":"Dog","actual_page":"Canine"}"#);
        assert_eq!(lines[1], r#"{"page":"Cat","text":"meow"}"#);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_records_error_and_aborts() {
        let (tx, rx) = bounded(4);
        tx.send(ResultRecord::Text {
            page: "Cat".into(),
            text: "meow".into(),
        })
        .unwrap();
        drop(tx);

        let lc = Lifecycle::new();
        let errs = Mutex::new(None);
        let written = run_writer_loop(rx, FailingWriter, &lc, &errs, None);

        assert_eq!(written, 0);
        assert!(lc.aborted());
        assert!(errs.lock().unwrap().as_deref().unwrap().contains("disk full"));
    }
}
