//! Run lifecycle: the pipeline's only global coordination state.

use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

/// Pipeline-wide phase, strictly forward: Parsing → Draining → ShuttingDown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Phase {
    /// The parser is still feeding the work queue.
    Parsing = 0,
    /// Input exhausted and work queue consumed; results still draining.
    Draining = 1,
    /// Everything drained (or an abort landed); no queue is touched again.
    ShuttingDown = 2,
}

impl Phase {
    fn from_u8(value: u8) -> Phase {
        match value {
            0 => Phase::Parsing,
            1 => Phase::Draining,
            _ => Phase::ShuttingDown,
        }
    }
}

/// Shared run state: phase cell, abort flag, records-written counter.
/// One per run, behind an `Arc`; every stage holds a clone.
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: AtomicU8,
    abort: AtomicBool,
    written: AtomicUsize,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Move to `next` unless the run is already past it. Phases never go
    /// backward; a stale advance is a no-op.
    pub fn advance(&self, next: Phase) {
        let prev = self.phase.fetch_max(next as u8, Ordering::AcqRel);
        if prev < next as u8 {
            debug!("lifecycle: {:?} -> {:?}", Phase::from_u8(prev), next);
        }
    }

    /// Early stop: queued work is discarded, stages exit after their current
    /// item. Stronger than normal completion, which drains both queues.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Release);
        self.advance(Phase::ShuttingDown);
    }

    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Acquire)
    }

    /// Count one written record; returns the new total.
    pub fn record_written(&self) -> usize {
        self.written.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn records_written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_never_go_backward() {
        let lc = Lifecycle::new();
        assert_eq!(lc.phase(), Phase::Parsing);
        lc.advance(Phase::ShuttingDown);
        lc.advance(Phase::Draining);
        assert_eq!(lc.phase(), Phase::ShuttingDown);
    }

    #[test]
    fn abort_jumps_to_shutting_down() {
        let lc = Lifecycle::new();
        lc.request_abort();
        assert!(lc.aborted());
        assert_eq!(lc.phase(), Phase::ShuttingDown);
    }

    #[test]
    fn written_counter_is_monotonic() {
        let lc = Lifecycle::new();
        assert_eq!(lc.record_written(), 1);
        assert_eq!(lc.record_written(), 2);
        assert_eq!(lc.records_written(), 2);
    }
}
