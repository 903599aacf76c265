use super::category::Category;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single processed log emission.
///
/// Built by the engine worker exactly once per emit, in stream order, and
/// handed to every handler by reference. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    sequence: u64,
    timestamp: DateTime<Utc>,
    severity: Severity,
    category: Category,
    message: String,
}

impl LogRecord {
    pub fn new(
        sequence: u64,
        timestamp: DateTime<Utc>,
        severity: Severity,
        category: Category,
        message: String,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            severity,
            category,
            message,
        }
    }

    /// Position of this record in the engine's processing order, starting at 0.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time of the emit call, not of processing.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let now = Utc::now();
        let record = LogRecord::new(
            7,
            now,
            Severity::Error,
            Category::NETWORK,
            "connection reset".to_string(),
        );

        assert_eq!(record.sequence(), 7);
        assert_eq!(record.timestamp(), now);
        assert_eq!(record.severity(), Severity::Error);
        assert_eq!(record.category(), &Category::NETWORK);
        assert_eq!(record.message(), "connection reset");
    }

    #[test]
    fn test_json_shape() {
        let record = LogRecord::new(
            0,
            Utc::now(),
            Severity::Info,
            Category::UI,
            "tapped".to_string(),
        );
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

        assert_eq!(value["severity"], "info");
        assert_eq!(value["category"], "UI");
        assert_eq!(value["message"], "tapped");
        assert_eq!(value["sequence"], 0);
    }
}
