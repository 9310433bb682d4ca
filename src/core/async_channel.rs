//! Deferred-mode channels backed by the tokio runtime
//!
//! [`DeferredChannel::write`] gates the entry, queues it for the channel's
//! writer task on the current runtime and returns immediately with a handle
//! that resolves once the entry is written. Each channel has one writer task,
//! so entries reach the writer in the order `write` was called.

use super::{
    channel::{Channel, ChannelOptions, Delivery},
    dispatch::settle,
    error::{LoggerError, Result},
    log_entry::LogEntry,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

/// Asynchronous write half of a deferred-mode channel
///
/// # Example
///
/// ```no_run
/// use rust_channel_logger::core::{AsyncEntryWriter, LogEntry, Result};
/// use async_trait::async_trait;
///
/// struct DatabaseWriter;
///
/// #[async_trait]
/// impl AsyncEntryWriter for DatabaseWriter {
///     async fn write_entry(&self, entry: &LogEntry) -> Result<()> {
///         // INSERT INTO logs ...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncEntryWriter<D = serde_json::Value>: Send + Sync + 'static
where
    D: Send + Sync + 'static,
{
    async fn write_entry(&self, entry: &LogEntry<D>) -> Result<()>;
}

type Job<D> = (Arc<LogEntry<D>>, oneshot::Sender<Result<()>>);

/// Channel whose write completes after [`Channel::write`] has returned
pub struct DeferredChannel<W, D = serde_json::Value> {
    name: String,
    options: ChannelOptions<D>,
    writer: Arc<W>,
    /// Sender of the running writer task, replaced when that task's runtime is gone
    queue: Mutex<Option<UnboundedSender<Job<D>>>>,
}

impl<W, D> DeferredChannel<W, D> {
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            options: ChannelOptions::new(),
            writer: Arc::new(writer),
            queue: Mutex::new(None),
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

impl<W, D> Deref for DeferredChannel<W, D> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.writer
    }
}

impl<W, D> DeferredChannel<W, D>
where
    W: AsyncEntryWriter<D>,
    D: Send + Sync + 'static,
{
    fn enqueue(&self, runtime: &Handle, job: Job<D>) -> Result<()> {
        let mut queue = self.queue.lock();
        let job = match queue.as_ref() {
            Some(sender) => match sender.send(job) {
                Ok(()) => return Ok(()),
                Err(SendError(job)) => job,
            },
            None => job,
        };

        let (sender, receiver) = mpsc::unbounded_channel();
        runtime.spawn(drain(self.name.clone(), Arc::clone(&self.writer), receiver));
        sender
            .send(job)
            .map_err(|_| LoggerError::deferred_task(&self.name, "writer task is not running"))?;
        *queue = Some(sender);
        Ok(())
    }
}

/// Write queued entries one at a time, each in its own task so a panic only fails that entry
async fn drain<W, D>(name: String, writer: Arc<W>, mut receiver: UnboundedReceiver<Job<D>>)
where
    W: AsyncEntryWriter<D>,
    D: Send + Sync + 'static,
{
    while let Some((entry, completion)) = receiver.recv().await {
        let writer = Arc::clone(&writer);
        let joined = tokio::spawn(async move { writer.write_entry(&entry).await }).await;
        let _ = completion.send(settle(&name, joined));
    }
}

impl<W, D> Channel<D> for DeferredChannel<W, D>
where
    W: AsyncEntryWriter<D>,
    D: Send + Sync + 'static,
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

        let runtime = Handle::try_current().map_err(|_| LoggerError::no_runtime(&self.name))?;
        let (completion, completed) = oneshot::channel();
        self.enqueue(&runtime, (Arc::clone(entry), completion))?;

        let name = self.name.clone();
        let handle = runtime.spawn(async move {
            completed.await.unwrap_or_else(|_| {
                Err(LoggerError::deferred_task(
                    name,
                    "writer task stopped before the entry was written",
                ))
            })
        });
        Ok(Delivery::Deferred(handle))
    }
}
