//! Bounded FIFO of recent log entries.

use std::collections::VecDeque;

use crate::level::Level;

/// Keeps the last `capacity` (level, message) pairs; the oldest entry is dropped first.
#[derive(Debug, Clone)]
pub struct RecentLogEntries {
    capacity: usize,
    entries: VecDeque<(Level, String)>,
}

impl RecentLogEntries {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, level: Level, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((level, message.into()));
    }

    /// Oldest first. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (Level, &str)> + '_ {
        self.entries.iter().map(|(level, msg)| (*level, msg.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a> IntoIterator for &'a RecentLogEntries {
    type Item = (Level, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (Level, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
