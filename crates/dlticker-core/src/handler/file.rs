//! Plain handlers for log files: no scroll awareness, timestamped lines.

use std::sync::Arc;

use crate::level::{LevelFilter, LevelRegistry};
use crate::record::LogRecord;
use crate::sink::Sink;

use super::Handler;

/// Line layout of a file handler. Messages carry their own line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `2024-05-01 12:00:00,123 INFO message`
    TimestampLevel,
    /// `2024-05-01 12:00:00,123 message`
    Timestamp,
}

pub struct FileHandler {
    sink: Arc<dyn Sink>,
    filter: LevelFilter,
    format: FileFormat,
}

impl FileHandler {
    pub fn new(sink: Arc<dyn Sink>, filter: LevelFilter, format: FileFormat) -> Self {
        Self {
            sink,
            filter,
            format,
        }
    }

    pub fn format_record(&self, record: &LogRecord, levels: &LevelRegistry) -> String {
        match self.format {
            FileFormat::TimestampLevel => format!(
                "{} {} {}",
                record.asctime(),
                levels.name_of(record.level()),
                record.message()
            ),
            FileFormat::Timestamp => format!("{} {}", record.asctime(), record.message()),
        }
    }
}

impl Handler for FileHandler {
    fn handle(&self, record: &LogRecord, levels: &LevelRegistry) {
        if self.filter.accepts(record.level()) {
            self.sink.write_text(&self.format_record(record, levels));
        }
    }
}
