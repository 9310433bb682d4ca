//! File channel for non-blocking log file writing
//!
//! Uses tokio::fs for fully asynchronous file I/O

use super::FormatFn;
use crate::core::{
    AsyncEntryWriter, DeferredChannel, LogEntry, LoggerError, OutputFormat, Result,
    TimestampFormat,
};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Deferred-mode channel appending records to a file
pub type FileChannel<D = Value> = DeferredChannel<FileWriter<D>, D>;

#[derive(Default)]
struct FileState {
    file: Option<File>,
    /// Set after the first open so that reopening never truncates
    opened: bool,
}

/// Writes one formatted record per entry to a file.
///
/// The file is opened lazily on the first write, or eagerly with
/// [`initialize`](Self::initialize), and released with [`close`](Self::close).
/// Writes are serialized, so concurrent deferred writes never interleave
/// within a record.
///
/// # Example
///
/// ```no_run
/// use rust_channel_logger::channels::{FileChannel, FileWriter};
/// use rust_channel_logger::Logger;
/// use std::sync::Arc;
///
/// # async fn example() -> rust_channel_logger::Result<()> {
/// let file: Arc<FileChannel> = Arc::new(FileChannel::new(
///     "file",
///     FileWriter::new("app.log").with_append(true),
/// ));
/// file.initialize().await?;
///
/// let mut logger = Logger::new("app");
/// logger.add_channel(Arc::clone(&file));
/// logger.info("written in the background", None, None).wait().await;
///
/// file.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct FileWriter<D = Value> {
    path: PathBuf,
    append: bool,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    format: Option<FormatFn<D>>,
    state: Mutex<FileState>,
}

impl<D> FileWriter<D> {
    /// Create a writer for `path`; the file is truncated on first open unless
    /// [`with_append`](Self::with_append) is set
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append: false,
            output_format: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
            format: None,
            state: Mutex::new(FileState::default()),
        }
    }

    /// Keep existing file contents and append to them
    #[must_use]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render entries with `format` instead of the output format
    #[must_use]
    pub fn with_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&LogEntry<D>) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file now instead of on the first write
    pub async fn initialize(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.file.is_none() {
            let file = self.open(state.opened).await?;
            state.file = Some(file);
            state.opened = true;
        }
        Ok(())
    }

    /// Flush and release the file handle; a later write reopens it in append mode
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(mut file) = state.file.take() {
            file.flush().await?;
        }
        Ok(())
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.file.is_some()
    }

    async fn open(&self, reopening: bool) -> Result<File> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if self.append || reopening {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        options.open(&self.path).await.map_err(|e| {
            LoggerError::io_operation("opening log file", self.path.display().to_string(), e)
        })
    }
}

impl<D: Serialize> FileWriter<D> {
    fn render(&self, entry: &LogEntry<D>) -> Result<String> {
        let mut output = match &self.format {
            Some(format) => format(entry),
            None => self.output_format.format(entry, &self.timestamp_format)?,
        };
        output.push('\n');
        Ok(output)
    }
}

#[async_trait]
impl<D> AsyncEntryWriter<D> for FileWriter<D>
where
    D: Serialize + Send + Sync + 'static,
{
    async fn write_entry(&self, entry: &LogEntry<D>) -> Result<()> {
        let output = self.render(entry)?;

        let mut state = self.state.lock().await;
        let file = match state.file.take() {
            Some(file) => file,
            None => {
                let file = self.open(state.opened).await?;
                state.opened = true;
                file
            }
        };

        let file = state.file.insert(file);
        file.write_all(output.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
