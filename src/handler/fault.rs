use crate::domain::{Category, LogRecord, Severity};
use chrono::Utc;
use std::any::Any;

/// Category of diagnostic records produced for handler faults.
pub const FAULT_CATEGORY: Category = Category::from_static("LogEngine");

/// A handler panicked while receiving a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFault {
    /// Position of the handler in the registry at delivery time.
    pub handler_index: usize,
    /// Sequence of the record being delivered.
    pub record_sequence: u64,
    pub panic_message: String,
}

impl HandlerFault {
    pub fn from_panic(
        handler_index: usize,
        record_sequence: u64,
        payload: &(dyn Any + Send),
    ) -> Self {
        let panic_message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self {
            handler_index,
            record_sequence,
            panic_message,
        }
    }

    /// Diagnostic record describing this fault, as delivered to a [`FaultSink`].
    pub fn to_record(&self) -> LogRecord {
        LogRecord::new(
            self.record_sequence,
            Utc::now(),
            Severity::Error,
            FAULT_CATEGORY,
            format!(
                "handler #{} panicked on record {}: {}",
                self.handler_index, self.record_sequence, self.panic_message
            ),
        )
    }
}

/// Fallback destination for handler fault diagnostics.
///
/// Never registered as a regular handler, so a faulting handler cannot feed
/// its own diagnostics back into itself.
pub trait FaultSink: Send + Sync {
    fn report(&self, diagnostic: &LogRecord);
}

/// Reports handler faults as `tracing` error events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFaultSink;

impl FaultSink for TracingFaultSink {
    fn report(&self, diagnostic: &LogRecord) {
        tracing::error!(
            category = %diagnostic.category(),
            record_sequence = diagnostic.sequence(),
            "{}",
            diagnostic.message()
        );
    }
}
