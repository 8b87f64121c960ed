//! Basic multiplexed logger usage example
//!
//! Demonstrates routing the three channels to the console with different
//! header flags, and the `log!` macro.
//!
//! Run with: cargo run --example basic_usage

use rust_multilog::log;
use rust_multilog::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Multilog - Basic Usage Example ===\n");

    // System and Access go to stdout, Error goes to stderr
    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .enable_log_files(false)
        .enable_console(true)
        .console(Channel::Access, true)
        .access_use_flags(true)
        .flags_standard(false)
        .flags_time(true)
        .flags_short_file(true)
        .init();

    println!("1. One line per channel:");
    mlw.system_logger().print("service started");
    mlw.access_logger().print("GET /devices 200");
    mlw.error_logger().print("device 42 not responding");

    println!("\n2. Formatted lines with the caller's position:");
    for attempt in 1..=3 {
        log!(mlw.system_logger(), "reconnect attempt {}", attempt);
    }

    println!("\n3. Raw writers bypass the header:");
    let mut writer = mlw.system_writer().clone();
    std::io::Write::write_all(&mut writer, b"raw bytes, no tag\n")?;

    println!("\nActive sinks:");
    for channel in Channel::ALL {
        println!("   {:<6} -> {:?}", channel, mlw.active_sinks(channel));
    }

    mlw.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
