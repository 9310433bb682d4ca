//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Entries logged
//! through them carry no data and no per-call metadata.
//!
//! # Examples
//!
//! ```
//! use rust_channel_logger::prelude::*;
//! use rust_channel_logger::info;
//!
//! let logger = Logger::new("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// Evaluates to the [`Dispatch`](crate::Dispatch) returned by the logger.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), None, None)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use rust_channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_channel_logger::fatal;
/// fatal!(logger, "Critical system failure");
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Build [`Metadata`](crate::Metadata) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use rust_channel_logger::metadata;
///
/// let meta = metadata! {
///     "requestId" => "abc-123",
///     "attempt" => 2,
/// };
/// assert_eq!(meta.len(), 2);
/// assert!(metadata!{}.is_empty());
/// ```
#[macro_export]
macro_rules! metadata {
    () => {
        $crate::Metadata::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut metadata = $crate::Metadata::new();
        $(
            metadata.insert($key, $value);
        )+
        metadata
    }};
}
