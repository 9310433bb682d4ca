//! Main logger implementation

use super::{
    channel::{Channel, Delivery},
    dispatch::Dispatch,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metadata::Metadata,
    metrics::LoggerMetrics,
    reporter::{panic_message, ErrorReporter, StderrReporter},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Construction-time configuration for a [`Logger`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerOptions {
    /// Default metadata merged into every entry
    #[serde(default)]
    pub metadata: Metadata,
}

impl LoggerOptions {
    /// Parse options from a JSON document
    ///
    /// ```
    /// use rust_channel_logger::LoggerOptions;
    ///
    /// let options = LoggerOptions::from_json(r#"{"metadata": {"service": "billing"}}"#).unwrap();
    /// assert_eq!(options.metadata.get("service").unwrap(), "billing");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fans each entry out to every registered channel, in registration order.
///
/// Channel failures and panics are reported through the configured
/// [`ErrorReporter`] and never reach the caller. Configuration methods take
/// `&mut self`; wrap the logger in your own lock to reconfigure it while it is
/// shared.
pub struct Logger<D = Value> {
    name: String,
    channels: Vec<Arc<dyn Channel<D>>>,
    default_metadata: Metadata,
    reporter: Arc<dyn ErrorReporter>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a logger carrying `serde_json::Value` payloads
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::typed(name)
    }

    #[must_use]
    pub fn with_options(name: impl Into<String>, options: LoggerOptions) -> Self {
        Self::typed_with_options(name, options)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_channel_logger::prelude::*;
    ///
    /// let logger = Logger::builder("api")
    ///     .field("service", "api")
    ///     .channel(MemoryChannel::new("memory", MemoryWriter::new(100)))
    ///     .build();
    /// assert_eq!(logger.channel_names(), vec!["memory"]);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl<D> Logger<D>
where
    D: Send + Sync + 'static,
{
    /// Create a logger with a caller-chosen payload type
    #[must_use]
    pub fn typed(name: impl Into<String>) -> Self {
        Self::typed_with_options(name, LoggerOptions::default())
    }

    #[must_use]
    pub fn typed_with_options(name: impl Into<String>, options: LoggerOptions) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
            default_metadata: options.metadata,
            reporter: Arc::new(StderrReporter),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a channel; it receives entries after every channel added before it
    pub fn add_channel<C>(&mut self, channel: Arc<C>) -> &mut Self
    where
        C: Channel<D> + 'static,
    {
        self.channels.push(channel);
        self
    }

    /// Append a channel that is already a trait object
    pub fn add_shared_channel(&mut self, channel: Arc<dyn Channel<D>>) -> &mut Self {
        self.channels.push(channel);
        self
    }

    /// Remove every channel named `name`; unknown names are ignored
    pub fn remove_channel(&mut self, name: &str) -> &mut Self {
        self.channels.retain(|channel| channel.name() != name);
        self
    }

    /// Replace the default metadata wholesale
    pub fn set_metadata(&mut self, metadata: Metadata) -> &mut Self {
        self.default_metadata = metadata;
        self
    }

    /// Replace the sink that receives channel failures
    pub fn set_reporter<R>(&mut self, reporter: R) -> &mut Self
    where
        R: ErrorReporter + 'static,
    {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.default_metadata
    }

    /// Registered channel names, in dispatch order
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use rust_channel_logger::Logger;
    ///
    /// let logger = Logger::new("app");
    /// logger.info("started", None, None);
    ///
    /// assert_eq!(logger.metrics().entries_logged(), 1);
    /// println!("Failure rate: {:.2}%", logger.metrics().failure_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Build an entry and hand it to every channel.
    ///
    /// Metadata is `defaults` overlaid with `metadata`. The returned
    /// [`Dispatch`] tracks deferred writes and can be ignored.
    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        let entry = Arc::new(LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data,
            metadata: self.default_metadata.merged(metadata.as_ref()),
        });
        self.metrics.record_entry();

        let mut dispatch = Dispatch::new(Arc::clone(&self.reporter), Arc::clone(&self.metrics));

        // Per-channel isolation: errors and panics stay with their channel
        for channel in &self.channels {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| channel.write(&entry)));

            match outcome {
                Ok(Ok(Delivery::Written)) => {
                    self.metrics.record_written();
                }
                Ok(Ok(Delivery::Skipped)) => {
                    self.metrics.record_skipped();
                }
                Ok(Ok(Delivery::Deferred(handle))) => {
                    self.metrics.record_deferred();
                    dispatch.track(channel.name(), handle);
                }
                Ok(Err(e)) => self.report_failure(channel.name(), &e),
                Err(panic_info) => {
                    let e = LoggerError::channel_panic(
                        channel.name(),
                        panic_message(panic_info.as_ref()),
                    );
                    self.report_failure(channel.name(), &e);
                }
            }
        }

        dispatch
    }

    fn report_failure(&self, channel: &str, error: &LoggerError) {
        self.metrics.record_failure();
        self.reporter.report(channel, error);
    }

    #[inline]
    pub fn debug(
        &self,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        self.log(LogLevel::Debug, message, data, metadata)
    }

    #[inline]
    pub fn info(
        &self,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        self.log(LogLevel::Info, message, data, metadata)
    }

    #[inline]
    pub fn warn(
        &self,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        self.log(LogLevel::Warn, message, data, metadata)
    }

    #[inline]
    pub fn error(
        &self,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        self.log(LogLevel::Error, message, data, metadata)
    }

    #[inline]
    pub fn fatal(
        &self,
        message: impl Into<String>,
        data: Option<D>,
        metadata: Option<Metadata>,
    ) -> Dispatch {
        self.log(LogLevel::Fatal, message, data, metadata)
    }
}

impl<D> Clone for Logger<D> {
    /// Share channels and reporter; metadata is copied, metrics start fresh
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            channels: self.channels.clone(),
            default_metadata: self.default_metadata.clone(),
            reporter: Arc::clone(&self.reporter),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

impl<D> std::fmt::Debug for Logger<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field(
                "channels",
                &self.channels.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("metadata", &self.default_metadata)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_channel_logger::prelude::*;
///
/// let logger = Logger::builder("worker")
///     .field("region", "eu-west-1")
///     .channel(ConsoleChannel::new("console", ConsoleWriter::stdout()))
///     .reporter(|channel: &str, error: &LoggerError| {
///         eprintln!("ALERT: {} failed: {}", channel, error);
///     })
///     .build();
/// ```
pub struct LoggerBuilder<D = Value> {
    name: String,
    metadata: Metadata,
    channels: Vec<Arc<dyn Channel<D>>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl<D> LoggerBuilder<D>
where
    D: Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Metadata::new(),
            channels: Vec::new(),
            reporter: None,
        }
    }

    /// Set the default metadata
    #[must_use = "builder methods return a new value"]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single default metadata field
    #[must_use = "builder methods return a new value"]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.metadata.insert(key, value);
        self
    }

    /// Add a channel owned by this logger
    #[must_use = "builder methods return a new value"]
    pub fn channel<C>(mut self, channel: C) -> Self
    where
        C: Channel<D> + 'static,
    {
        self.channels.push(Arc::new(channel));
        self
    }

    /// Add a channel that other loggers may share
    #[must_use = "builder methods return a new value"]
    pub fn shared_channel(mut self, channel: Arc<dyn Channel<D>>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Set the sink for channel failures (stderr by default)
    #[must_use = "builder methods return a new value"]
    pub fn reporter<R>(mut self, reporter: R) -> Self
    where
        R: ErrorReporter + 'static,
    {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger<D> {
        let mut logger = Logger::typed_with_options(
            self.name,
            LoggerOptions {
                metadata: self.metadata,
            },
        );

        if let Some(reporter) = self.reporter {
            logger.reporter = reporter;
        }
        for channel in self.channels {
            logger.add_shared_channel(channel);
        }

        logger
    }
}
