//! Output sinks: serialized, newline-free writes to a destination.
//!
//! A sink never fails from the caller's point of view. Write errors are reported
//! as diagnostics and the call returns normally so the next write can retry.

mod rotating;
mod stream;

pub use rotating::RotatingFileSink;
pub use stream::StreamSink;

/// Destination for rendered log text.
pub trait Sink: Send + Sync {
    /// Write `text` verbatim as one atomic unit. No newline is appended.
    fn write_text(&self, text: &str);
}
