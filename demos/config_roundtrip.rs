//! Configuration document example
//!
//! Demonstrates saving the configuration, restoring it and the fallback
//! for a missing document.
//!
//! Run with: cargo run --example config_roundtrip

use rust_multilog::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Multilog - Config Roundtrip Example ===\n");

    let dir = std::env::temp_dir().join("rust_multilog_config_demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("multilog.json");

    let builder = MultiLoggerBuilder::new()
        .defaults()
        .app_name("config_roundtrip")
        .app_dir(dir.display().to_string())
        .enable_access(true)
        .syslog_prot("udp")
        .syslog_host("127.0.0.1")
        .syslog_port("514");

    println!("1. Document before init:\n{}", builder.get_config()?);
    builder.save_config(&path)?;

    println!("2. Restored from {}", path.display());
    let restored = MultiLoggerBuilder::try_from_file(&path)?;
    assert_eq!(restored.settings(), builder.settings());

    let mlw = restored.init();
    mlw.access_logger().print("GET /config 200");
    println!("3. Document after init (paths resolved, tags normalized):\n{}", mlw.get_config()?);

    println!("4. Missing document falls back to an empty configuration:");
    let fallback = MultiLoggerBuilder::from_file(dir.join("missing.json"));
    println!("   empty = {}", fallback.settings() == &Settings::default());

    mlw.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
