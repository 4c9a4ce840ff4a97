//! Run counters

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters for one run
///
/// Counters only ever grow. Take a [`RunStatsSnapshot`] to read them
/// consistently.
#[derive(Debug, Default)]
pub struct RunStats {
    listed: AtomicUsize,
    detail_fetched: AtomicUsize,
    transformed: AtomicUsize,
    batches_sent: AtomicUsize,
    batches_failed: AtomicUsize,
    records_loaded: AtomicUsize,
    records_failed: AtomicUsize,
    records_skipped: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listed(&self, count: usize) {
        self.listed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_detail_fetched(&self) {
        self.detail_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transformed(&self) {
        self.transformed.fetch_add(1, Ordering::Relaxed);
    }

    /// A record was dropped before loading (detail or transform failure)
    pub fn record_skipped(&self) {
        self.records_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_sent(&self, records: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.records_loaded.fetch_add(records, Ordering::Relaxed);
    }

    pub fn record_batch_failed(&self, records: usize) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        self.records_failed.fetch_add(records, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunStatsSnapshot {
        RunStatsSnapshot {
            listed: self.listed.load(Ordering::Relaxed),
            detail_fetched: self.detail_fetched.load(Ordering::Relaxed),
            transformed: self.transformed.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            records_loaded: self.records_loaded.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RunStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatsSnapshot {
    pub listed: usize,
    pub detail_fetched: usize,
    pub transformed: usize,
    pub batches_sent: usize,
    pub batches_failed: usize,
    pub records_loaded: usize,
    /// Records in batches that failed to load
    pub records_failed: usize,
    /// Records dropped on detail fetch or transform failure
    pub records_skipped: usize,
}
