//! Channel contract for log output destinations
//!
//! A channel owns three things: a stable name, its gating options and the
//! actual write. Gating lives in [`ChannelOptions::accepts`] and is shared by
//! both scheduling modes, [`ImmediateChannel`] here and
//! [`DeferredChannel`](super::async_channel::DeferredChannel).

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Predicate applied to a fully built entry after the level thresholds
pub type EntryFilter<D> = Arc<dyn Fn(&LogEntry<D>) -> bool + Send + Sync>;

/// Per-channel gating, fixed at channel construction.
///
/// Every configured gate must pass for an entry to be written.
pub struct ChannelOptions<D = serde_json::Value> {
    min_level: Option<LogLevel>,
    max_level: Option<LogLevel>,
    filter: Option<EntryFilter<D>>,
}

impl<D> ChannelOptions<D> {
    pub fn new() -> Self {
        Self {
            min_level: None,
            max_level: None,
            filter: None,
        }
    }

    /// Reject entries below `level`
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Reject entries above `level`
    #[must_use]
    pub fn max_level(mut self, level: LogLevel) -> Self {
        self.max_level = Some(level);
        self
    }

    /// Reject entries for which `filter` returns false
    #[must_use]
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&LogEntry<D>) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn min(&self) -> Option<LogLevel> {
        self.min_level
    }

    pub fn max(&self) -> Option<LogLevel> {
        self.max_level
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Gate an entry: minimum level, then maximum level, then the filter
    pub fn accepts(&self, entry: &LogEntry<D>) -> bool {
        if let Some(min) = self.min_level {
            if entry.level < min {
                return false;
            }
        }

        if let Some(max) = self.max_level {
            if entry.level > max {
                return false;
            }
        }

        match &self.filter {
            Some(filter) => filter(entry),
            None => true,
        }
    }
}

impl<D> Default for ChannelOptions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for ChannelOptions<D> {
    fn clone(&self) -> Self {
        Self {
            min_level: self.min_level,
            max_level: self.max_level,
            filter: self.filter.clone(),
        }
    }
}

impl<D> fmt::Debug for ChannelOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelOptions")
            .field("min_level", &self.min_level)
            .field("max_level", &self.max_level)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Result of handing an entry to a channel
#[derive(Debug)]
pub enum Delivery {
    /// Gating rejected the entry; nothing was written
    Skipped,
    /// The write completed before `write` returned
    Written,
    /// The write was started and finishes in the background
    Deferred(JoinHandle<Result<()>>),
}

impl Delivery {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Delivery::Skipped)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Delivery::Deferred(_))
    }
}

/// A log destination as seen by the [`Logger`](super::logger::Logger).
///
/// Channels are shared (`Arc`) and may be registered on several loggers, so
/// every method takes `&self`; a channel serializes its own internal state.
pub trait Channel<D = serde_json::Value>: Send + Sync {
    fn name(&self) -> &str;

    /// Pure accept/reject decision for `entry`
    fn should_log(&self, entry: &LogEntry<D>) -> bool;

    /// Gate, then write. A rejected entry yields `Delivery::Skipped`.
    fn write(&self, entry: &Arc<LogEntry<D>>) -> Result<Delivery>;
}

/// Synchronous write half of an immediate-mode channel
pub trait EntryWriter<D = serde_json::Value>: Send + Sync {
    fn write_entry(&self, entry: &LogEntry<D>) -> Result<()>;
}

impl<D, F> EntryWriter<D> for F
where
    F: Fn(&LogEntry<D>) -> Result<()> + Send + Sync,
{
    fn write_entry(&self, entry: &LogEntry<D>) -> Result<()> {
        self(entry)
    }
}

/// Channel whose write runs to completion inside [`Channel::write`]
pub struct ImmediateChannel<W, D = serde_json::Value> {
    name: String,
    options: ChannelOptions<D>,
    writer: W,
}

impl<W, D> ImmediateChannel<W, D> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            options: ChannelOptions::new(),
            writer,
        }
    }

    /// Replace the gating options
    #[must_use]
    pub fn with_options(mut self, options: ChannelOptions<D>) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ChannelOptions<D> {
        &self.options
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W, D> Deref for ImmediateChannel<W, D> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.writer
    }
}

impl<W, D> Channel<D> for ImmediateChannel<W, D>
where
    W: EntryWriter<D>,
    D: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn should_log(&self, entry: &LogEntry<D>) -> bool {
        self.options.accepts(entry)
    }

    fn write(&self, entry: &Arc<LogEntry<D>>) -> Result<Delivery> {
        if !self.should_log(entry) {
            return Ok(Delivery::Skipped);
        }

        self.writer.write_entry(entry)?;
        Ok(Delivery::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use parking_lot::Mutex;

    fn entry(level: LogLevel) -> Arc<LogEntry> {
        Arc::new(LogEntry::new(level, "message"))
    }

    #[test]
    fn test_options_default_accepts_everything() {
        let options: ChannelOptions = ChannelOptions::new();
        for level in LogLevel::ALL {
            assert!(options.accepts(&entry(level)));
        }
    }

    #[test]
    fn test_options_level_window() {
        let options: ChannelOptions = ChannelOptions::new()
            .min_level(LogLevel::Info)
            .max_level(LogLevel::Error);

        assert!(!options.accepts(&entry(LogLevel::Debug)));
        assert!(options.accepts(&entry(LogLevel::Info)));
        assert!(options.accepts(&entry(LogLevel::Error)));
        assert!(!options.accepts(&entry(LogLevel::Fatal)));
    }

    #[test]
    fn test_options_filter_and_levels_combined() {
        let options: ChannelOptions = ChannelOptions::new()
            .min_level(LogLevel::Warn)
            .filter(|e| e.message.starts_with("db"));

        let mut db_warn = LogEntry::new(LogLevel::Warn, "db slow");
        assert!(options.accepts(&db_warn));

        db_warn.level = LogLevel::Info;
        assert!(!options.accepts(&db_warn));

        assert!(!options.accepts(&LogEntry::new(LogLevel::Error, "http 500")));
    }

    #[test]
    fn test_immediate_channel_skips_rejected_entries() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);
        let channel = ImmediateChannel::new("recorder", move |e: &LogEntry| -> Result<()> {
            sink.lock().push(e.message.clone());
            Ok(())
        })
        .with_options(ChannelOptions::new().min_level(LogLevel::Warn));

        assert!(channel.write(&entry(LogLevel::Info)).unwrap().is_skipped());
        assert!(matches!(
            channel.write(&entry(LogLevel::Warn)).unwrap(),
            Delivery::Written
        ));
        assert_eq!(written.lock().len(), 1);
    }

    #[test]
    fn test_immediate_channel_propagates_write_error() {
        let channel = ImmediateChannel::new("broken", |_: &LogEntry| -> Result<()> {
            Err(LoggerError::other("disk full"))
        });

        let err = channel.write(&entry(LogLevel::Info)).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(channel.name(), "broken");
    }
}
