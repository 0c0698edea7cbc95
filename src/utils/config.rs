//! Application tuning constants in one place.

use std::thread;

/// Capacity of each pipeline queue. Bounded sends are the only backpressure:
/// resident records never exceed twice this, whatever the dump size.
pub const DEFAULT_QUEUE_CAP: usize = 2000;

/// Cap on the default worker count. The transforms are cheap enough per
/// page that more threads mostly add contention on the queues.
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Worker threads when not overridden: available parallelism, capped.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MAX_DEFAULT_WORKERS)
        .min(MAX_DEFAULT_WORKERS)
}
