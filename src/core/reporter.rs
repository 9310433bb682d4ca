//! Diagnostic sink for channel failures
//!
//! The logger never returns channel errors to its caller. Instead every
//! failure is handed to an [`ErrorReporter`], which defaults to stderr.

use super::error::LoggerError;
use std::fmt;

/// Receives `(channel name, failure)` for every failed channel write
pub trait ErrorReporter: Send + Sync {
    fn report(&self, channel: &str, error: &LoggerError);
}

impl<F> ErrorReporter for F
where
    F: Fn(&str, &LoggerError) + Send + Sync,
{
    fn report(&self, channel: &str, error: &LoggerError) {
        self(channel, error)
    }
}

/// Default reporter: one line per failure on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, channel: &str, error: &LoggerError) {
        eprintln!("[LOGGER ERROR] Error writing to channel {}: {}", channel, error);
    }
}

/// A channel failure observed while settling a dispatch
#[derive(Debug)]
pub struct ChannelFailure {
    pub channel: String,
    pub error: LoggerError,
}

impl fmt::Display for ChannelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.channel, self.error)
    }
}

/// Turn a caught panic payload into a printable message
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_closure_reporter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = move |channel: &str, error: &LoggerError| {
            sink.lock().push(format!("{} -> {}", channel, error));
        };

        reporter.report("file", &LoggerError::other("disk full"));
        assert_eq!(*seen.lock(), vec!["file -> disk full".to_string()]);
    }

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }

    #[test]
    fn test_failure_display() {
        let failure = ChannelFailure {
            channel: "db".to_string(),
            error: LoggerError::other("timeout"),
        };
        assert_eq!(failure.to_string(), "db: timeout");
    }
}
