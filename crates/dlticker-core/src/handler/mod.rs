//! Record handlers: decide whether a record is wanted, format it, write it.

mod file;
mod scroll;

pub use file::{FileFormat, FileHandler};
pub use scroll::{ScrollContext, ScrollableHandler};

use crate::level::LevelRegistry;
use crate::record::LogRecord;

/// A destination for log records. Implementations filter by level themselves.
pub trait Handler: Send + Sync {
    fn handle(&self, record: &LogRecord, levels: &LevelRegistry);
}
