//! File logging example
//!
//! Demonstrates logging to both a console channel and a deferred file channel.
//!
//! Run with: cargo run --example file_logging

use rust_channel_logger::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Channel Logger - File Logging Example ===\n");

    let file: Arc<FileChannel> = Arc::new(FileChannel::new(
        "file",
        FileWriter::new("logs/application.log")
            .with_append(true)
            .with_output_format(OutputFormat::Json),
    ));
    file.initialize().await?;

    let mut logger = Logger::builder("files")
        .field("pid", std::process::id())
        .channel(ConsoleChannel::new(
            "console",
            ConsoleWriter::stdout().with_output_format(OutputFormat::Text),
        ))
        .build();
    logger.add_channel(Arc::clone(&file));

    println!("1. Logging to both console and file:");
    logger.info("Application started", None, None);
    logger.debug("Loading configuration...", None, None);
    logger.warn("Using default settings for some options", None, None);
    logger.error(
        "Failed to load optional plugin",
        Some(json!({"plugin": "metrics", "reason": "not installed"})),
        None,
    );

    println!("\n2. Waiting for each file write:");
    for i in 1..=5 {
        let failures = logger
            .info(format!("Processing item {}/5", i), Some(json!({"item": i})), None)
            .wait()
            .await;
        for failure in failures {
            eprintln!("write failed: {}", failure);
        }
    }

    logger.info("All operations completed", None, None).wait().await;
    file.close().await?;

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the full log output", file.path().display());

    Ok(())
}
