//! Output format configuration for log entries
//!
//! - Text: `[timestamp] LEVEL: message`, then `Data:` and `Metadata:` lines
//! - Pretty: same layout with indented JSON payloads
//! - Json: one JSON object per entry

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::Serialize;

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with compact JSON payloads (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] INFO: Request processed`
    #[default]
    Text,

    /// Human-readable text with indented JSON payloads
    Pretty,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"INFO","message":"Request processed","timestamp":"2025-01-08T10:30:45.123Z"}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    ///
    /// Fails only when the entry's data cannot be serialized.
    pub fn format<D>(&self, entry: &LogEntry<D>, timestamp_format: &TimestampFormat) -> Result<String>
    where
        D: Serialize,
    {
        match self {
            OutputFormat::Text => self.format_text(entry, timestamp_format, false),
            OutputFormat::Pretty => self.format_text(entry, timestamp_format, true),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
        }
    }

    fn format_text<D: Serialize>(
        &self,
        entry: &LogEntry<D>,
        timestamp_format: &TimestampFormat,
        pretty: bool,
    ) -> Result<String> {
        let mut output = format!(
            "[{}] {}: {}",
            timestamp_format.format(&entry.timestamp),
            entry.level.to_str(),
            entry.message
        );

        if let Some(ref data) = entry.data {
            output.push_str("\nData: ");
            output.push_str(&render(data, pretty)?);
        }

        if !entry.metadata.is_empty() {
            output.push_str("\nMetadata: ");
            output.push_str(&render(&entry.metadata, pretty)?);
        }

        Ok(output)
    }

    fn format_json<D: Serialize>(
        &self,
        entry: &LogEntry<D>,
        timestamp_format: &TimestampFormat,
    ) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json_value(&entry.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        if let Some(ref data) = entry.data {
            json_obj.insert("data".to_string(), serde_json::to_value(data)?);
        }
        if !entry.metadata.is_empty() {
            json_obj.insert("metadata".to_string(), entry.metadata.to_json_value());
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Metadata};
    use serde_json::json;

    #[test]
    fn test_text_format() {
        let entry: LogEntry = LogEntry::new(LogLevel::Info, "Test message");
        let result = OutputFormat::Text
            .format(&entry, &TimestampFormat::Iso8601)
            .unwrap();

        assert!(result.contains("] INFO: Test message"));
        assert!(!result.contains("Data:"));
        assert!(!result.contains("Metadata:"));
    }

    #[test]
    fn test_text_format_with_payloads() {
        let entry = LogEntry::new(LogLevel::Warn, "User logged in")
            .with_data(json!({"userId": "123"}))
            .with_metadata(Metadata::new().with_field("sessionId", "abc"));

        let result = OutputFormat::Text
            .format(&entry, &TimestampFormat::Iso8601)
            .unwrap();

        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("WARN: User logged in"));
        assert_eq!(lines[1], r#"Data: {"userId":"123"}"#);
        assert_eq!(lines[2], r#"Metadata: {"sessionId":"abc"}"#);
    }

    #[test]
    fn test_pretty_format_indents_payloads() {
        let entry = LogEntry::new(LogLevel::Debug, "payload").with_data(json!({"a": 1}));
        let result = OutputFormat::Pretty
            .format(&entry, &TimestampFormat::Iso8601)
            .unwrap();

        assert!(result.contains("Data: {\n  \"a\": 1\n}"));
    }

    #[test]
    fn test_json_format() {
        let entry = LogEntry::new(LogLevel::Error, "Error occurred")
            .with_data(json!([1, 2]))
            .with_metadata(Metadata::new().with_field("request_id", "abc-123"));
        let result = OutputFormat::Json
            .format(&entry, &TimestampFormat::UnixMillis)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["message"], "Error occurred");
        assert_eq!(parsed["data"], json!([1, 2]));
        assert_eq!(parsed["metadata"]["request_id"], "abc-123");
        assert!(parsed["timestamp"].is_number());
    }

    #[test]
    fn test_unserializable_data_is_an_error() {
        use std::collections::HashMap;

        // Non-string map keys cannot become JSON object keys
        let mut data = HashMap::new();
        data.insert(vec![1u8], "x");
        let entry = LogEntry::new(LogLevel::Info, "bad").with_data(data);

        assert!(OutputFormat::Json
            .format(&entry, &TimestampFormat::Iso8601)
            .is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
