//! Custom channel example
//!
//! Demonstrates a user-defined deferred channel, an in-memory channel and a
//! custom error reporter.
//!
//! Run with: cargo run --example custom_channel

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_channel_logger::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Stand-in for a database table of log rows
#[derive(Default)]
struct DatabaseWriter {
    rows: Mutex<Vec<String>>,
    offline: bool,
}

#[async_trait]
impl AsyncEntryWriter for DatabaseWriter {
    async fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        // Simulated round trip
        tokio::time::sleep(Duration::from_millis(5)).await;

        if self.offline {
            return Err(LoggerError::channel_write("database", "connection refused"));
        }

        let row = serde_json::to_string(entry)?;
        self.rows.lock().push(row);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Channel Logger - Custom Channel Example ===\n");

    let database: Arc<DeferredChannel<DatabaseWriter>> = Arc::new(
        DeferredChannel::new("database", DatabaseWriter::default())
            .with_options(ChannelOptions::new().min_level(LogLevel::Warn)),
    );
    let recent: Arc<MemoryChannel> = Arc::new(MemoryChannel::new("recent", MemoryWriter::new(3)));

    let mut logger = Logger::builder("orders")
        .field("service", "orders")
        .channel(ConsoleChannel::new("console", ConsoleWriter::stdout()))
        .reporter(|channel: &str, error: &LoggerError| {
            eprintln!("ALERT: channel {} failed: {}", channel, error);
        })
        .build();
    logger
        .add_channel(Arc::clone(&database))
        .add_channel(Arc::clone(&recent));

    println!("1. Only WARN and above reach the database:");
    logger.info("Order received", Some(json!({"orderId": 1})), None);
    logger
        .warn("Payment retry", Some(json!({"orderId": 1, "attempt": 2})), None)
        .wait()
        .await;
    logger
        .error("Payment failed", Some(json!({"orderId": 1})), None)
        .wait()
        .await;

    for row in database.rows.lock().iter() {
        println!("   row: {}", row);
    }

    println!("\n2. The memory channel keeps the last three entries:");
    logger.info("Order shipped", None, None);
    for message in recent.messages() {
        println!("   {}", message);
    }

    println!("\n3. An offline database is reported, not raised:");
    let mut offline = Logger::new("offline");
    offline
        .set_reporter(|channel: &str, error: &LoggerError| {
            eprintln!("ALERT: channel {} failed: {}", channel, error);
        })
        .add_channel(Arc::new(DeferredChannel::new(
            "database",
            DatabaseWriter {
                offline: true,
                ..DatabaseWriter::default()
            },
        )));
    let failures = offline.fatal("Unreachable", None, None).wait().await;
    println!("   failures collected: {}", failures.len());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
