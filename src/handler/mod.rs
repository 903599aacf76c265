//! Sinks that consume log records.
//!
//! Handlers run on the engine worker thread, one record at a time, in
//! registration order. A handler may perform arbitrary I/O; the engine imposes
//! no timeout on it. Panics are caught per invocation and reported to the
//! engine's [`FaultSink`].

pub mod fault;
pub mod memory;

pub use fault::{FaultSink, HandlerFault, TracingFaultSink};
pub use memory::MemoryHandler;

use crate::domain::LogRecord;

/// Consumer of log records.
pub trait LogHandler: Send + Sync {
    fn receive(&self, record: &LogRecord);
}

/// Adapts a closure into a [`LogHandler`].
pub struct FnHandler<F>
where
    F: Fn(&LogRecord) + Send + Sync,
{
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&LogRecord) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> LogHandler for FnHandler<F>
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn receive(&self, record: &LogRecord) {
        (self.f)(record);
    }
}

impl<F> std::fmt::Debug for FnHandler<F>
where
    F: Fn(&LogRecord) + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Severity};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fn_handler_invokes_closure() {
        let calls = AtomicUsize::new(0);
        let handler = FnHandler::new(|record: &LogRecord| {
            assert_eq!(record.message(), "hello");
            calls.fetch_add(1, Ordering::SeqCst);
        });

        let record = LogRecord::new(
            0,
            Utc::now(),
            Severity::Info,
            Category::GENERAL,
            "hello".to_string(),
        );
        handler.receive(&record);
        handler.receive(&record);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
