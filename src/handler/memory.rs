use super::LogHandler;
use crate::domain::{Category, LogRecord, Severity};
use parking_lot::Mutex;

/// Handler that keeps every record it receives.
///
/// Useful for tests and in-process inspection. Memory grows without bound
/// until [`MemoryHandler::clear`] is called.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    pub fn severities(&self) -> Vec<Severity> {
        self.records.lock().iter().map(LogRecord::severity).collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.records
            .lock()
            .iter()
            .map(|r| r.category().clone())
            .collect()
    }
}

impl LogHandler for MemoryHandler {
    fn receive(&self, record: &LogRecord) {
        self.records.lock().push(record.clone());
    }
}
