//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Numeric value outside the DEBUG..=FATAL range
    #[error("Invalid log level: {0}")]
    InvalidLevel(u8),

    /// Channel reported a failed write
    #[error("Channel '{channel}' failed to write: {message}")]
    ChannelWrite { channel: String, message: String },

    /// Channel panicked while gating or writing an entry
    #[error("Channel '{channel}' panicked: {message}")]
    ChannelPanic { channel: String, message: String },

    /// Deferred channel invoked outside of a tokio runtime
    #[error("Channel '{channel}' requires a tokio runtime for deferred writes")]
    NoRuntime { channel: String },

    /// Deferred write task was cancelled or aborted
    #[error("Deferred write on channel '{channel}' did not complete: {message}")]
    DeferredTask { channel: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a channel write error
    pub fn channel_write(channel: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ChannelWrite {
            channel: channel.into(),
            message: message.into(),
        }
    }

    pub fn channel_panic(channel: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::ChannelPanic {
            channel: channel.into(),
            message: message.into(),
        }
    }

    pub fn no_runtime(channel: impl Into<String>) -> Self {
        LoggerError::NoRuntime {
            channel: channel.into(),
        }
    }

    pub fn deferred_task(channel: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DeferredTask {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::channel_write("file", "disk full");
        assert!(matches!(err, LoggerError::ChannelWrite { .. }));

        let err = LoggerError::deferred_task("db", "task was cancelled");
        assert!(matches!(err, LoggerError::DeferredTask { .. }));

        let err = LoggerError::no_runtime("db");
        assert!(matches!(err, LoggerError::NoRuntime { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::channel_write("file", "disk full");
        assert_eq!(err.to_string(), "Channel 'file' failed to write: disk full");

        let err = LoggerError::InvalidLevel(5);
        assert_eq!(err.to_string(), "Invalid log level: 5");

        let err = LoggerError::channel_panic("console", "boom");
        assert_eq!(err.to_string(), "Channel 'console' panicked: boom");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open app.log", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open app.log"));
    }
}
