//! Priority-ordered set of active segments.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::segment::{Segment, SegmentId};

/// Ordering key: priority first, then arrival order so equal priorities stay stable.
type OrderKey = (u32, u64);

#[derive(Default)]
struct RegistryInner {
    order: BTreeMap<OrderKey, Arc<Segment>>,
    index: HashMap<SegmentId, OrderKey>,
    next_seq: u64,
    high_water_mark: usize,
}

/// Point-in-time view handed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// Ascending by priority, ties in insertion order.
    pub segments: Vec<Arc<Segment>>,
    pub high_water_mark: usize,
}

/// Shared by worker threads (add/remove) and the render thread (snapshot).
/// Every operation is a single critical section.
#[derive(Default)]
pub struct TickerRegistry {
    inner: Mutex<RegistryInner>,
}

impl TickerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Track a segment. Adding a segment that is already tracked does nothing.
    pub fn add(&self, segment: Arc<Segment>) {
        let mut inner = self.lock();
        if inner.index.contains_key(&segment.id()) {
            return;
        }
        let key = (segment.priority(), inner.next_seq);
        inner.next_seq += 1;
        inner.index.insert(segment.id(), key);
        inner.order.insert(key, segment);
        inner.high_water_mark = inner.high_water_mark.max(inner.order.len());
    }

    /// Stop tracking a segment; a segment that is not tracked is ignored.
    pub fn remove(&self, segment: &Segment) {
        let mut inner = self.lock();
        if let Some(key) = inner.index.remove(&segment.id()) {
            inner.order.remove(&key);
        }
    }

    /// Drop all segments. The high-water mark is kept.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.order.clear();
        inner.index.clear();
    }

    /// Drop all segments and zero the high-water mark (end of a scroll session).
    pub fn clear_history(&self) {
        let mut inner = self.lock();
        inner.order.clear();
        inner.index.clear();
        inner.high_water_mark = 0;
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let inner = self.lock();
        RegistrySnapshot {
            segments: inner.order.values().cloned().collect(),
            high_water_mark: inner.high_water_mark,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    pub fn high_water_mark(&self) -> usize {
        self.lock().high_water_mark
    }
}
