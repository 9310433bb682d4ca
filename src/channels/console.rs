//! Console channel implementation

use super::FormatFn;
use crate::core::{
    EntryWriter, ImmediateChannel, LogEntry, LoggerError, OutputFormat, Result, TimestampFormat,
};
use colored::Colorize;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::Arc;

/// Immediate-mode channel printing to the console
pub type ConsoleChannel<D = Value> = ImmediateChannel<ConsoleWriter<D>, D>;

/// Writes one formatted record per entry to stdout or any other `Write`
pub struct ConsoleWriter<D = Value> {
    target: Mutex<Box<dyn Write + Send>>,
    use_colors: bool,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    format: Option<FormatFn<D>>,
}

impl<D> ConsoleWriter<D> {
    pub fn stdout() -> Self {
        Self::with_target(io::stdout())
    }

    /// Write to an arbitrary target instead of stdout
    pub fn with_target<W>(target: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            target: Mutex::new(Box::new(target)),
            use_colors: false,
            output_format: OutputFormat::Pretty,
            timestamp_format: TimestampFormat::default(),
            format: None,
        }
    }

    /// Color each record by level
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this channel
    ///
    /// # Example
    ///
    /// ```
    /// use rust_channel_logger::channels::ConsoleWriter;
    /// use rust_channel_logger::OutputFormat;
    ///
    /// let writer: ConsoleWriter = ConsoleWriter::stdout()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
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

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }
}

impl<D: Serialize> ConsoleWriter<D> {
    fn render(&self, entry: &LogEntry<D>) -> Result<String> {
        let output = match &self.format {
            Some(format) => format(entry),
            None => self.output_format.format(entry, &self.timestamp_format)?,
        };

        if self.use_colors {
            Ok(output.color(entry.level.color_code()).to_string())
        } else {
            Ok(output)
        }
    }
}

impl<D> EntryWriter<D> for ConsoleWriter<D>
where
    D: Serialize + Send + Sync,
{
    fn write_entry(&self, entry: &LogEntry<D>) -> Result<()> {
        let output = self.render(entry)?;

        let mut target = self.target.lock();
        writeln!(target, "{}", output)
            .and_then(|_| target.flush())
            .map_err(|e| LoggerError::io_operation("writing to console", "write failed", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Channel, LogLevel, Metadata};
    use serde_json::json;

    /// Cloneable in-memory target
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    #[test]
    fn test_console_default_layout() {
        let buffer = SharedBuffer::default();
        let channel: ConsoleChannel =
            ConsoleChannel::new("console", ConsoleWriter::with_target(buffer.clone()));

        let entry = Arc::new(
            LogEntry::new(LogLevel::Info, "User logged in")
                .with_data(json!({"userId": "123"}))
                .with_metadata(Metadata::new().with_field("sessionId", "abc")),
        );
        channel.write(&entry).unwrap();

        let output = buffer.contents();
        assert!(output.contains("INFO: User logged in"));
        assert!(output.contains("Data: {\n  \"userId\": \"123\"\n}"));
        assert!(output.contains("Metadata: {\n  \"sessionId\": \"abc\"\n}"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_console_custom_format() {
        let buffer = SharedBuffer::default();
        let channel: ConsoleChannel = ConsoleChannel::new(
            "console",
            ConsoleWriter::with_target(buffer.clone())
                .with_format(|e: &LogEntry| format!("{} | {}", e.level, e.message)),
        );

        channel
            .write(&Arc::new(LogEntry::new(LogLevel::Fatal, "x")))
            .unwrap();
        assert_eq!(buffer.contents(), "FATAL | x\n");
    }

    #[test]
    fn test_console_colors_wrap_output() {
        colored::control::set_override(true);

        let buffer = SharedBuffer::default();
        let channel: ConsoleChannel = ConsoleChannel::new(
            "console",
            ConsoleWriter::with_target(buffer.clone()).with_colors(true),
        );
        assert!(channel.uses_colors());

        channel
            .write(&Arc::new(LogEntry::new(LogLevel::Error, "red alert")))
            .unwrap();

        let output = buffer.contents();
        assert!(output.contains("red alert"));
        assert!(output.contains("\x1b["));

        colored::control::unset_override();
    }
}
