//! # Rust Channel Logger
//!
//! Structured, leveled logging that fans each entry out to a list of
//! pluggable output channels.
//!
//! ## Features
//!
//! - **Channels**: Console, file and in-memory channels, plus any type
//!   implementing [`Channel`]
//! - **Per-channel gating**: Level window and predicate filter per channel
//! - **Failure isolation**: A failing or panicking channel never affects the
//!   caller or the other channels
//! - **Deferred writes**: Channels may complete on the tokio runtime; the
//!   returned [`Dispatch`] can be awaited
//! - **Instrumentation**: Log start, finish and failure of wrapped calls
//!
//! ## Example
//!
//! ```
//! use rust_channel_logger::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let memory: Arc<MemoryChannel> = Arc::new(MemoryChannel::new("memory", MemoryWriter::new(100)));
//!
//! let mut logger = Logger::builder("api").field("service", "api").build();
//! logger.add_channel(Arc::clone(&memory));
//!
//! logger.info("User logged in", Some(json!({"userId": "123"})), None);
//!
//! let entries = memory.entries();
//! assert_eq!(entries[0].metadata.get("service"), Some(&json!("api")));
//! ```

pub mod channels;
pub mod core;
pub mod instrument;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::channels::{ConsoleChannel, ConsoleWriter};
    #[cfg(feature = "file")]
    pub use crate::channels::{FileChannel, FileWriter};
    pub use crate::channels::{MemoryChannel, MemoryWriter};
    pub use crate::core::{
        AsyncEntryWriter, Channel, ChannelFailure, ChannelOptions, DeferredChannel, Delivery,
        Dispatch, EntryWriter, ErrorReporter, ImmediateChannel, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, LoggerOptions, Metadata, OutputFormat, Result,
        StderrReporter, TimestampFormat,
    };
    pub use crate::instrument::{instrument, Instrumented, MethodOptions};
}

#[cfg(feature = "console")]
pub use channels::{ConsoleChannel, ConsoleWriter};
#[cfg(feature = "file")]
pub use channels::{FileChannel, FileWriter};
pub use channels::{MemoryChannel, MemoryWriter};
pub use core::{
    AsyncEntryWriter, Channel, ChannelFailure, ChannelOptions, DeferredChannel, Delivery,
    Dispatch, EntryFilter, EntryWriter, ErrorReporter, ImmediateChannel, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggerOptions, Metadata, OutputFormat,
    Result, StderrReporter, TimestampFormat,
};
pub use instrument::{instrument, Instrumented, MethodOptions};
