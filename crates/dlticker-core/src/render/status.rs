//! Queue-wide figures shown on the aggregate line, supplied by the download engine.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// What the renderer needs to know about the download queue as a whole.
pub trait QueueStatus: Send + Sync {
    /// Bytes still queued for download.
    fn queued_bytes(&self) -> u64;

    fn is_paused(&self) -> bool;

    /// Combined speed of all connections in KB/s. `None` makes the renderer sum
    /// the speeds of the files currently on screen.
    fn total_speed_kbps(&self) -> Option<f64> {
        None
    }
}

/// Atomic-backed [`QueueStatus`] that engine threads update in place.
#[derive(Debug, Default)]
pub struct SharedQueueStatus {
    queued: AtomicU64,
    paused: AtomicBool,
}

impl SharedQueueStatus {
    pub fn new(queued_bytes: u64) -> Self {
        Self {
            queued: AtomicU64::new(queued_bytes),
            paused: AtomicBool::new(false),
        }
    }

    pub fn set_queued_bytes(&self, bytes: u64) {
        self.queued.store(bytes, Ordering::Relaxed);
    }

    /// Account for downloaded bytes; never goes below zero.
    pub fn consume(&self, bytes: u64) {
        let _ = self
            .queued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |q| {
                Some(q.saturating_sub(bytes))
            });
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }
}

impl QueueStatus for SharedQueueStatus {
    fn queued_bytes(&self) -> u64 {
        self.queued.load(Ordering::Relaxed)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }
}
