use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by a batch worker across its lifetime, shared with the [`crate::Batcher`]
/// handle so they can be inspected while the worker runs.
#[derive(Debug)]
pub(crate) struct WindowStats {
    /// Human readable name used to identify these stats when they are reported.
    tag: &'static str,
    /// Number of windows that were opened by a first request.
    windows_opened: AtomicU64,
    /// Number of times the batch function actually ran.
    fetches: AtomicU64,
    /// Fetches that returned an error to their whole window.
    failed_fetches: AtomicU64,
    /// Total requests that were queued in some window.
    requests: AtomicU64,
    /// Requests whose caller had stopped waiting by the time the window resolved.
    abandoned: AtomicU64,
    /// The largest number of requests resolved by a single fetch.
    max_window_size: AtomicU64,
}

/// Point-in-time copy of a batcher's window counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub windows_opened: u64,
    pub fetches: u64,
    pub failed_fetches: u64,
    pub requests: u64,
    pub abandoned: u64,
    pub max_window_size: u64,
}

impl WindowStats {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            windows_opened: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            failed_fetches: AtomicU64::new(0),
            requests: AtomicU64::new(0),
            abandoned: AtomicU64::new(0),
            max_window_size: AtomicU64::new(0),
        }
    }

    pub fn record_window_opened(&self) {
        self.windows_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self, window_size: usize, failed: bool) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.failed_fetches.fetch_add(1, Ordering::Relaxed);
        }
        self.max_window_size.fetch_max(window_size as u64, Ordering::Relaxed);
    }

    pub fn record_abandoned(&self, count: usize) {
        self.abandoned.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> BatchStats {
        BatchStats {
            windows_opened: self.windows_opened.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
            max_window_size: self.max_window_size.load(Ordering::Relaxed),
        }
    }
}

impl Drop for WindowStats {
    fn drop(&mut self) {
        tracing::debug!(tag = self.tag, window_stats = ?self.snapshot());
    }
}
