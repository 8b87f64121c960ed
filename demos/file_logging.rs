//! File logging example
//!
//! Demonstrates the default configuration: System and Error channels
//! written to `<app-dir>/log/`, Access discarded.
//!
//! Run with: cargo run --example file_logging

use rust_multilog::prelude::*;
use std::io::Write;

fn main() -> Result<()> {
    println!("=== Rust Multilog - File Logging Example ===\n");

    let app_dir = std::env::temp_dir().join("rust_multilog_demo");
    std::fs::create_dir_all(&app_dir)?;

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_name("file_logging")
        .app_dir(app_dir.display().to_string())
        .init();

    println!("Log directory: {}", mlw.config().log_dir);
    for channel in Channel::ALL {
        println!("   {:<6} -> {:?}", channel, mlw.active_sinks(channel));
    }

    for i in 0..5 {
        mlw.system_logger().print(format!("processing batch {}", i));
    }
    mlw.access_logger().print("this line is discarded");
    mlw.error_logger().print("batch 3 had 2 rejected records");

    // Buffered output reaches the file only on flush
    let mut buffered = mlw.error_buf_writer().clone();
    writeln!(buffered, "error buffered summary: 2 rejected")?;
    mlw.flush()?;

    for file in [&mlw.config().log_files.system, &mlw.config().log_files.error] {
        println!("\n--- {} ---", file);
        print!("{}", std::fs::read_to_string(file)?);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
