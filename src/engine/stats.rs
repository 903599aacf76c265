use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// Point-in-time view of engine counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngineStats {
    /// Emits accepted onto the stream.
    pub emitted: u64,
    /// Emits turned into records and fanned out.
    pub processed: u64,
    /// Successful handler invocations.
    pub delivered: u64,
    /// Emits rejected by the backlog bound or after shutdown.
    pub dropped: u64,
    /// Handler invocations that panicked.
    pub handler_faults: u64,
    /// Emits accepted but not yet processed.
    pub pending: usize,
    /// Registrations currently in the registry.
    pub handlers: usize,
}

pub(crate) struct EngineStatsCollector {
    emitted: AtomicU64,
    processed: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
    handler_faults: AtomicU64,
    pending: AtomicUsize,
    handlers: AtomicUsize,
    // Set on the first drop of an overflow episode, cleared once the backlog drains
    overflowing: AtomicBool,
}

impl EngineStatsCollector {
    pub fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            handler_faults: AtomicU64::new(0),
            pending: AtomicUsize::new(0),
            handlers: AtomicUsize::new(0),
            overflowing: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> EngineStats {
        EngineStats {
            emitted: self.emitted.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            handler_faults: self.handler_faults.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Acquire),
            handlers: self.handlers.load(Ordering::Relaxed),
        }
    }

    /// Reserves a backlog slot. Returns false when `limit` is already reached.
    pub fn try_reserve(&self, limit: Option<usize>) -> bool {
        let Some(limit) = limit else {
            self.pending.fetch_add(1, Ordering::AcqRel);
            return true;
        };

        loop {
            let current = self.pending.load(Ordering::Acquire);
            if current >= limit {
                return false;
            }
            if self
                .pending
                .compare_exchange_weak(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    /// Gives back a slot taken by `try_reserve` when the emit never reached the stream.
    pub fn release(&self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }

    pub fn record_emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.overflowing.store(false, Ordering::Relaxed);
        }
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a dropped emit. Returns true if this drop starts a new overflow episode.
    pub fn record_dropped(&self) -> bool {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        !self.overflowing.swap(true, Ordering::Relaxed)
    }

    pub fn record_fault(&self) {
        self.handler_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_handlers(&self, count: usize) {
        self.handlers.store(count, Ordering::Relaxed);
    }
}
