//! In-memory channel retaining the most recent entries

use crate::core::{AsyncEntryWriter, EntryWriter, ImmediateChannel, LogEntry, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// Immediate-mode channel keeping entries in memory
pub type MemoryChannel<D = Value> = ImmediateChannel<MemoryWriter<D>, D>;

/// Bounded buffer of entries; the oldest entry is evicted once `max_size` is exceeded.
///
/// Implements both writer traits, so it can also back a
/// [`DeferredChannel`](crate::core::DeferredChannel).
pub struct MemoryWriter<D = Value> {
    entries: Mutex<VecDeque<LogEntry<D>>>,
    max_size: usize,
}

impl<D> MemoryWriter<D> {
    pub const DEFAULT_MAX_SIZE: usize = 1000;

    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_size,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<D: Clone> MemoryWriter<D> {
    /// Snapshot of retained entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry<D>> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Messages of retained entries, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }
}

impl<D> Default for MemoryWriter<D> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE)
    }
}

impl<D> EntryWriter<D> for MemoryWriter<D>
where
    D: Clone + Send + Sync,
{
    fn write_entry(&self, entry: &LogEntry<D>) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.push_back(entry.clone());
        while entries.len() > self.max_size {
            entries.pop_front();
        }
        Ok(())
    }
}

#[async_trait]
impl<D> AsyncEntryWriter<D> for MemoryWriter<D>
where
    D: Clone + Send + Sync + 'static,
{
    async fn write_entry(&self, entry: &LogEntry<D>) -> Result<()> {
        <Self as EntryWriter<D>>::write_entry(self, entry)
    }
}
