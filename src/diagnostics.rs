// In-memory diagnostics sink.
// Collects log records for the sidebar log panel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }
}

/// A single diagnostics record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// One-line text form used by the log panel.
    pub fn render(&self) -> String {
        format!(
            "{} {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Shared, append-only log buffer.
///
/// Cloning yields another handle to the same buffer. Lives as long as the
/// last handle, which in practice is the process.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl DiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: LogRecord) {
        self.lock().push(record);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(LogRecord::info(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(LogRecord::error(message));
    }

    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.lock().iter().filter(|r| r.level == level).count()
    }

    /// Whole buffer as text, one record per line.
    pub fn render(&self) -> String {
        self.lock()
            .iter()
            .map(|r| r.render() + "\n")
            .collect()
    }

    /// The last `max_chars` characters of [`render`](Self::render).
    pub fn render_tail(&self, max_chars: usize) -> String {
        let text = self.render();
        let total = text.chars().count();
        if total <= max_chars {
            return text;
        }
        text.chars().skip(total - max_chars).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
