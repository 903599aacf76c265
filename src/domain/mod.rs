//! Domain layer for rask-log-engine.
//!
//! Contains the canonical types shared across all modules:
//! - `LogRecord`: The value every handler receives
//! - `Severity`: Record importance (Debug/Info/Warning/Error/Critical)
//! - `Category`: Named origin of a record

pub mod category;
pub mod log_record;
pub mod severity;

pub use category::Category;
pub use log_record::LogRecord;
pub use severity::{ParseSeverityError, Severity};
