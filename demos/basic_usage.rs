//! Basic logger usage example
//!
//! Demonstrates console output, per-channel level windows and metadata.
//!
//! Run with: cargo run --example basic_usage

use rust_channel_logger::prelude::*;
use rust_channel_logger::{info, metadata, warn};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Channel Logger - Basic Usage Example ===\n");

    // Default metadata attached to every entry
    let mut logger = Logger::builder("basic")
        .field("service", "example")
        .build();

    // Colored console channel
    logger.add_channel(Arc::new(ConsoleChannel::new(
        "console",
        ConsoleWriter::stdout().with_colors(true),
    )));

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", None, None);
    logger.info("This is an info message", None, None);
    logger.warn("This is a warning message", None, None);
    logger.error("This is an error message", None, None);
    logger.fatal("This is a fatal message", None, None);

    println!("\n2. Data and per-call metadata:");
    logger.info(
        "User logged in",
        Some(json!({"userId": "123"})),
        Some(metadata! { "sessionId" => "abc" }),
    );

    println!("\n3. Replacing the console with a WARN-and-above JSON channel:");
    logger.remove_channel("console");
    logger.add_channel(Arc::new(
        ConsoleChannel::new(
            "console-json",
            ConsoleWriter::stdout().with_output_format(OutputFormat::Json),
        )
        .with_options(ChannelOptions::new().min_level(LogLevel::Warn)),
    ));

    info!(logger, "Info message (hidden)");
    warn!(logger, "Disk usage at {}%", 91);

    println!("\n=== Example completed successfully! ===");
    println!("Entries logged: {}", logger.metrics().entries_logged());

    Ok(())
}
