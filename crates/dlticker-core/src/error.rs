//! Initialization errors for the logging facility.

use std::path::PathBuf;

/// Errors that abort facility startup. Anything that can go wrong after startup
/// (sink writes, rotation, rendering) is reported as a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    /// A control level the scroll handler dispatches on was never registered.
    #[error("required control level `{0}` is not registered")]
    MissingControlLevel(&'static str),

    /// A log file's parent directory could not be created.
    #[error("cannot create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A log file could not be opened for appending.
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The render thread could not be spawned.
    #[error("failed to spawn render thread: {0}")]
    RenderThread(#[source] std::io::Error),
}
