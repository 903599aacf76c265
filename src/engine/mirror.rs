// Secondary copies of every processed record: the tracing platform sink and the console stream.

use crate::domain::{LogRecord, Severity};
use std::io::Write;

/// Formats a record the way the console mirror prints it:
/// `[CATEGORY] [SEVERITY] message`.
pub fn format_console_line(record: &LogRecord) -> String {
    format!(
        "[{}] [{}] {}",
        record.category().name().to_uppercase(),
        record.severity().as_str(),
        record.message()
    )
}

/// Emits `record` as a `tracing` event on the `rask_log_engine::mirror` target.
pub fn mirror_to_tracing(record: &LogRecord) {
    let category = record.category().name();
    let severity = record.severity().as_str();
    let sequence = record.sequence();
    let message = record.message();

    match record.severity() {
        Severity::Debug => tracing::debug!(
            target: "rask_log_engine::mirror",
            category,
            severity,
            sequence,
            "{message}"
        ),
        Severity::Info => tracing::info!(
            target: "rask_log_engine::mirror",
            category,
            severity,
            sequence,
            "{message}"
        ),
        Severity::Warning => tracing::warn!(
            target: "rask_log_engine::mirror",
            category,
            severity,
            sequence,
            "{message}"
        ),
        Severity::Error => tracing::error!(
            target: "rask_log_engine::mirror",
            category,
            severity,
            sequence,
            "{message}"
        ),
        Severity::Critical => tracing::error!(
            target: "rask_log_engine::mirror",
            category,
            severity,
            sequence,
            "{message}"
        ),
    }
}

pub(crate) struct Mirror {
    tracing: bool,
    console: Option<Box<dyn Write + Send>>,
    min_severity: Severity,
}

impl Mirror {
    pub fn new(
        tracing: bool,
        console: Option<Box<dyn Write + Send>>,
        min_severity: Severity,
    ) -> Self {
        Self {
            tracing,
            console,
            min_severity,
        }
    }

    pub fn mirror(&mut self, record: &LogRecord) {
        if record.severity() < self.min_severity {
            return;
        }

        if self.tracing {
            mirror_to_tracing(record);
        }

        if let Some(console) = self.console.as_mut() {
            // Console output is best-effort
            let _ = writeln!(console, "{}", format_console_line(record));
            let _ = console.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn record(severity: Severity, category: Category, message: &str) -> LogRecord {
        LogRecord::new(3, Utc::now(), severity, category, message.to_string())
    }

    #[test]
    fn test_console_line_format() {
        let line = format_console_line(&record(Severity::Info, Category::NETWORK, "m1"));
        assert_eq!(line, "[NETWORK] [INFO] m1");

        let line = format_console_line(&record(
            Severity::Critical,
            Category::new("Payments"),
            "ledger mismatch",
        ));
        assert_eq!(line, "[PAYMENTS] [CRITICAL] ledger mismatch");
    }

    #[test]
    fn test_console_mirror_respects_min_severity() {
        let buffer = SharedBuffer::default();
        let mut mirror = Mirror::new(false, Some(Box::new(buffer.clone())), Severity::Warning);

        mirror.mirror(&record(Severity::Info, Category::UI, "hidden"));
        mirror.mirror(&record(Severity::Error, Category::UI, "shown"));

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(output, "[UI] [ERROR] shown\n");
    }

    #[traced_test]
    #[test]
    fn test_tracing_mirror_emits_event() {
        mirror_to_tracing(&record(Severity::Warning, Category::DATABASE, "slow query"));

        assert!(logs_contain("slow query"));
        assert!(logs_contain("category=\"Database\""));
        assert!(logs_contain("severity=\"WARNING\""));
        assert!(logs_contain("sequence=3"));
        assert!(logs_contain("WARN"));
    }

    #[traced_test]
    #[test]
    fn test_tracing_mirror_marks_critical_severity() {
        mirror_to_tracing(&record(Severity::Critical, Category::UI, "render loop died"));

        assert!(logs_contain("render loop died"));
        assert!(logs_contain("severity=\"CRITICAL\""));
        assert!(logs_contain("ERROR"));
    }
}
