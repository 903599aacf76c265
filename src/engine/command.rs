use crate::domain::{Category, Severity};
use crate::handler::LogHandler;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Completion callback run by the worker when a barrier is dequeued.
pub(crate) type BarrierSignal = Box<dyn FnOnce() + Send>;

/// An emit that has been accepted but not yet turned into a record.
pub(crate) struct PendingEmit {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub emitted_at: DateTime<Utc>,
}

/// Unit of work on the serialization stream.
pub(crate) enum Command {
    Emit(PendingEmit),
    AddHandler(Arc<dyn LogHandler>),
    RemoveHandler(Arc<dyn LogHandler>),
    RemoveAllHandlers,
    Barrier(BarrierSignal),
    Shutdown,
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Emit(_) => "emit",
            Command::AddHandler(_) => "add_handler",
            Command::RemoveHandler(_) => "remove_handler",
            Command::RemoveAllHandlers => "remove_all_handlers",
            Command::Barrier(_) => "barrier",
            Command::Shutdown => "shutdown",
        }
    }
}
