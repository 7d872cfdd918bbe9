//! Immutable log records.

use chrono::{DateTime, Local};

use crate::level::Level;

/// One log event as seen by every handler.
#[derive(Debug, Clone)]
pub struct LogRecord {
    level: Level,
    message: String,
    timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Timestamp in log-file form: `2024-05-01 12:00:00,123`.
    pub fn asctime(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S,%3f").to_string()
    }
}
