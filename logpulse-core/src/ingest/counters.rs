use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals shared by every pipeline stage.
#[derive(Debug, Default)]
pub struct IngestCounters {
    lines_read: AtomicU64,
    lines_malformed: AtomicU64,
    batches_sealed: AtomicU64,
    events_written: AtomicU64,
    events_dropped: AtomicU64,
    write_retries: AtomicU64,
    requeues: AtomicU64,
}

/// Point-in-time copy of [`IngestCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub lines_read: u64,
    pub lines_malformed: u64,
    pub batches_sealed: u64,
    pub events_written: u64,
    pub events_dropped: u64,
    pub write_retries: u64,
    pub requeues: u64,
}

impl IngestCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.lines_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self) {
        self.batches_sealed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_written(&self, events: usize) {
        self.events_written
            .fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, events: usize) {
        self.events_dropped
            .fetch_add(events as u64, Ordering::Relaxed);
    }

    pub fn record_retries(&self, retries: u32) {
        self.write_retries
            .fetch_add(u64::from(retries), Ordering::Relaxed);
    }

    pub fn record_requeue(&self) {
        self.requeues.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> IngestReport {
        IngestReport {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_malformed: self.lines_malformed.load(Ordering::Relaxed),
            batches_sealed: self.batches_sealed.load(Ordering::Relaxed),
            events_written: self.events_written.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            write_retries: self.write_retries.load(Ordering::Relaxed),
            requeues: self.requeues.load(Ordering::Relaxed),
        }
    }
}
