//! Channel implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

use crate::core::LogEntry;
use std::sync::Arc;

/// Custom record renderer, replaces a channel's configured output format
pub type FormatFn<D> = Arc<dyn Fn(&LogEntry<D>) -> String + Send + Sync>;

#[cfg(feature = "console")]
pub use console::{ConsoleChannel, ConsoleWriter};
#[cfg(feature = "file")]
pub use file::{FileChannel, FileWriter};
pub use memory::{MemoryChannel, MemoryWriter};

// Re-export the channel contract for implementers
pub use crate::core::{AsyncEntryWriter, Channel, EntryWriter};
