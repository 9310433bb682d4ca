//! Core logger types and traits

pub mod async_channel;
pub mod channel;
pub mod dispatch;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metadata;
pub mod metrics;
pub mod output_format;
pub mod reporter;
pub mod timestamp;

pub use async_channel::{AsyncEntryWriter, DeferredChannel};
pub use channel::{Channel, ChannelOptions, Delivery, EntryFilter, EntryWriter, ImmediateChannel};
pub use dispatch::Dispatch;
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerOptions};
pub use metadata::Metadata;
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use reporter::{ChannelFailure, ErrorReporter, StderrReporter};
pub use timestamp::TimestampFormat;
