//! Logging utilities
//!
//! Subscriber setup plus the run-log formatting helpers.

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Write the run-log header
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nINPI status run - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// Log program startup
pub fn log_startup(max_concurrent: usize, entry_url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 starting - batch patent status mode");
    info!("🌐 portal entry: {}", entry_url);
    info!("📊 max concurrent tasks: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// Log how many protection numbers were loaded
pub fn log_numbers_loaded(total: usize, max_concurrent: usize) {
    info!("✓ found {} protection number(s) to process", total);
    info!("📋 processing in batches of {}", max_concurrent);
}

/// Log batch start
pub fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 batch {}/{}", batch_num, total_batches);
    info!("📄 patents {}-{} of {}", start, end, total);
    info!("{}", "=".repeat(60));
}

/// Log batch completion
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ batch {} done: {}/{} extracted", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// Print the final run statistics
pub fn print_final_stats(
    success: usize,
    failed: &[String],
    total: usize,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 run complete");
    info!(
        "finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ classified and persisted: {}/{}", success, total);
    info!("❌ failed: {}", failed.len());
    if !failed.is_empty() {
        info!("failed protection numbers: {}", failed.join(", "));
    }
    info!("{}", "=".repeat(60));
    info!("\nlog saved to: {}", log_file_path);
}
