//! Log entry structure

use super::log_level::LogLevel;
use super::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable log record.
///
/// `data` is the caller's payload and stays opaque to the logger; `metadata`
/// is already merged with the logger defaults by the time a channel sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry<D = serde_json::Value> {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl<D> LogEntry<D> {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data: None,
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_builder() {
        let before = Utc::now();
        let entry: LogEntry = LogEntry::new(LogLevel::Warn, "disk almost full")
            .with_data(json!({"free_mb": 12}))
            .with_metadata(Metadata::new().with_field("host", "db-1"));

        assert!(entry.timestamp >= before);
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "disk almost full");
        assert_eq!(entry.data, Some(json!({"free_mb": 12})));
        assert_eq!(entry.metadata.get("host"), Some(&json!("db-1")));
    }

    #[test]
    fn test_entry_serialization_skips_missing_data() {
        let entry: LogEntry<u32> = LogEntry::new(LogLevel::Info, "ready");
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["level"], json!("INFO"));
        assert_eq!(value["metadata"], json!({}));
    }
}
