//! Tracked download segments shown by the live frame.
//!
//! Workers add a segment when its transfer starts and remove it when done; the
//! render thread reads an ordered snapshot.

mod registry;
mod segment;

pub use registry::{RegistrySnapshot, TickerRegistry};
pub use segment::{DownloadFile, FileProgress, Segment, SegmentId};
