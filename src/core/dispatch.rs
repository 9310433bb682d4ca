//! Aggregate handle for the deferred writes started by one log call

use super::{
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    reporter::{ChannelFailure, ErrorReporter},
};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

struct PendingWrite {
    channel: String,
    handle: JoinHandle<Result<()>>,
    /// A watcher task already reports this write's failure
    watched: bool,
}

/// Outcome of a single `log` call.
///
/// Immediate channels have finished by the time a `Dispatch` exists. Deferred
/// channels may still be running; their failures reach the logger's reporter
/// whether or not this handle is awaited. Dropping it detaches the writes.
pub struct Dispatch {
    pending: Vec<PendingWrite>,
    reporter: Arc<dyn ErrorReporter>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatch {
    pub(crate) fn new(reporter: Arc<dyn ErrorReporter>, metrics: Arc<LoggerMetrics>) -> Self {
        Self {
            pending: Vec::new(),
            reporter,
            metrics,
        }
    }

    /// Attach a deferred write, watching it for failure when a runtime is available
    pub(crate) fn track(&mut self, channel: &str, handle: JoinHandle<Result<()>>) {
        let pending = match Handle::try_current() {
            Ok(runtime) => {
                let name = channel.to_string();
                let reporter = Arc::clone(&self.reporter);
                let metrics = Arc::clone(&self.metrics);

                let watcher = runtime.spawn(async move {
                    let outcome = settle(&name, handle.await);
                    match &outcome {
                        Ok(()) => {
                            metrics.record_written();
                        }
                        Err(e) => {
                            metrics.record_failure();
                            reporter.report(&name, e);
                        }
                    }
                    outcome
                });

                PendingWrite {
                    channel: channel.to_string(),
                    handle: watcher,
                    watched: true,
                }
            }
            Err(_) => PendingWrite {
                channel: channel.to_string(),
                handle,
                watched: false,
            },
        };

        self.pending.push(pending);
    }

    /// Number of deferred writes started by this call
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Channel names of the deferred writes, in dispatch order
    pub fn pending_channels(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|p| p.channel.as_str())
    }

    /// True when every channel finished inside the `log` call
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Wait for every deferred write and collect the ones that failed
    pub async fn wait(self) -> Vec<ChannelFailure> {
        let mut failures = Vec::new();

        for pending in self.pending {
            let outcome = settle(&pending.channel, pending.handle.await);
            if let Err(error) = outcome {
                if !pending.watched {
                    self.metrics.record_failure();
                    self.reporter.report(&pending.channel, &error);
                }
                failures.push(ChannelFailure {
                    channel: pending.channel,
                    error,
                });
            } else if !pending.watched {
                self.metrics.record_written();
            }
        }

        failures
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("pending", &self.pending.iter().map(|p| &p.channel).collect::<Vec<_>>())
            .finish()
    }
}

pub(crate) fn settle(channel: &str, joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) if e.is_panic() => Err(LoggerError::channel_panic(
            channel,
            super::reporter::panic_message(e.into_panic().as_ref()),
        )),
        Err(e) => Err(LoggerError::deferred_task(channel, e.to_string())),
    }
}
