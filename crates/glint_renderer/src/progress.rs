//! Progress reporting for parallel renders.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, TryLockError};
use std::time::{Duration, Instant};

/// Receives the completed fraction of a render, in `[0, 1]`.
///
/// Calls are serialized by the renderer, so implementations may write to a
/// terminal without their own locking.
pub trait ProgressSink: Sync {
    fn update(&self, fraction: f32);
}

/// Discards progress.
impl ProgressSink for () {
    fn update(&self, _fraction: f32) {}
}

/// Minimum wall time between two reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Shared progress counter for the rows of one render.
///
/// Rows complete in any order; each completion bumps an atomic counter and
/// compares the elapsed time against the last report time, also atomic. Only
/// a completion that finds a report due tries the lock serializing the sink,
/// and skips the report if another row holds it.
pub(crate) struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    total: usize,
    completed: AtomicUsize,
    start: Instant,
    /// Milliseconds after `start` of the latest report
    last_report_ms: AtomicU64,
    report_lock: Mutex<()>,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink, total: usize) -> Self {
        Self {
            sink,
            total,
            completed: AtomicUsize::new(0),
            start: Instant::now(),
            last_report_ms: AtomicU64::new(0),
            report_lock: Mutex::new(()),
        }
    }

    /// Record one finished unit of work.
    pub(crate) fn complete_one(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);

        let now_ms = self.start.elapsed().as_millis() as u64;
        if !self.report_due(now_ms) {
            return;
        }

        // A poisoned lock only means another reporter panicked; keep going.
        let _guard = match self.report_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return,
        };
        // Another row may have reported between the check and the lock
        if !self.report_due(now_ms) {
            return;
        }

        let completed = self.completed.load(Ordering::Relaxed);
        self.sink.update(completed as f32 / self.total as f32);
        self.last_report_ms.store(now_ms, Ordering::Relaxed);
    }

    fn report_due(&self, now_ms: u64) -> bool {
        let last_ms = self.last_report_ms.load(Ordering::Relaxed);
        now_ms.saturating_sub(last_ms) >= REPORT_INTERVAL.as_millis() as u64
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Report completion unconditionally.
    pub(crate) fn finish(&self) {
        let _guard = self.report_lock.lock();
        self.sink.update(1.0);
    }
}
