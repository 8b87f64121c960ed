//! Integration tests for the multiplexed logger
//!
//! These tests verify:
//! - Default configuration writes System/Error to files under `<app-dir>/log/`
//! - Per-channel routing to files and syslog, one line per sink
//! - Sink failures are isolated to the failing sink
//! - Configuration documents round-trip and degrade to defaults
//! - Buffered writers and caller-supplied sinks

use parking_lot::Mutex;
use rust_multilog::prelude::*;
use rust_multilog::log;
use std::fs;
use std::io::{self, Write};
use std::net::UdpSocket;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().clone()).expect("utf8")
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }
}

fn udp_collector() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind collector");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("timeout");
    let port = socket.local_addr().expect("addr").port();
    (socket, port)
}

fn recv(socket: &UdpSocket) -> Option<String> {
    let mut buf = [0u8; 4096];
    socket
        .recv(&mut buf)
        .ok()
        .map(|n| String::from_utf8_lossy(&buf[..n]).into_owned())
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}

fn app_dir(temp_dir: &TempDir) -> String {
    temp_dir.path().display().to_string()
}

#[test]
fn test_default_configuration_scenario() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .init();

    mlw.system_logger().print("system started");
    mlw.error_logger().print("something failed");
    mlw.access_logger().print("GET / 200");

    let log_dir = temp_dir.path().join("log");
    let system = read_lines(&log_dir.join("system.log"));
    let error = read_lines(&log_dir.join("error.log"));

    assert_eq!(system.len(), 1);
    assert!(system[0].starts_with("system "));
    assert!(system[0].ends_with("system started"));
    assert_eq!(error.len(), 1);
    assert!(error[0].starts_with("error "));

    assert!(!log_dir.join("access.log").exists());
    assert_eq!(mlw.active_sinks(Channel::Access), vec!["discard".to_string()]);
}

#[test]
fn test_standard_header_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .init();
    mlw.system_logger().print("hello");

    let line = &read_lines(&temp_dir.path().join("log/system.log"))[0];
    // "system YYYY/MM/DD HH:MM:SS hello"
    let parts: Vec<&str> = line.splitn(4, ' ').collect();
    assert_eq!(parts[0], "system");
    assert_eq!(parts[1].len(), 10);
    assert_eq!(parts[1].matches('/').count(), 2);
    assert_eq!(parts[2].len(), 8);
    assert_eq!(parts[2].matches(':').count(), 2);
    assert_eq!(parts[3], "hello");
}

#[test]
fn test_every_channel_writer_accepts_writes_without_sinks() {
    let mlw = MultiLoggerBuilder::new().init();

    for channel in Channel::ALL {
        let mut writer = mlw.writer(channel).clone();
        assert!(writer.write_all(b"dropped\n").is_ok());
        let mut buffered = mlw.buf_writer(channel).clone();
        assert!(buffered.write_all(b"dropped\n").is_ok());
        mlw.logger(channel).print("dropped");
    }
    assert!(mlw.flush().is_ok());
}

#[test]
fn test_routing_one_line_per_opened_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (collector, port) = udp_collector();

    let mlw = MultiLoggerBuilder::new()
        .app_dir(app_dir(&temp_dir))
        .system_log("system.log")
        .access_log("access.log")
        .error_log("error.log")
        .system_tag("system")
        .error_tag("error")
        .log_file(Channel::System, true)
        .syslog(Channel::System, true)
        .log_file(Channel::Access, true)
        .syslog(Channel::Error, true)
        .syslog_prot("udp")
        .syslog_host("127.0.0.1")
        .syslog_port(port.to_string())
        .syslog_tag("routing")
        .init();

    let log_dir = temp_dir.path().join("log");
    assert_eq!(mlw.active_sinks(Channel::System).len(), 2);
    assert_eq!(mlw.active_sinks(Channel::Access).len(), 1);
    assert_eq!(mlw.active_sinks(Channel::Error).len(), 1);

    mlw.system_logger().print("to file and syslog");

    assert_eq!(read_lines(&log_dir.join("system.log")).len(), 1);
    assert!(read_lines(&log_dir.join("access.log")).is_empty());
    assert!(!log_dir.join("error.log").exists());

    let message = recv(&collector).expect("system datagram");
    assert!(message.starts_with("<190>"), "got {}", message);
    assert!(message.contains("routing["));
    assert!(message.ends_with("system to file and syslog"));

    mlw.error_logger().print("only syslog");
    let message = recv(&collector).expect("error datagram");
    assert!(message.starts_with("<187>"), "got {}", message);
    assert!(message.ends_with("error only syslog"));

    // nothing else was sent
    collector
        .set_read_timeout(Some(Duration::from_millis(100)))
        .unwrap();
    assert!(recv(&collector).is_none());
}

#[test]
fn test_unopenable_file_does_not_block_other_sinks() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "regular file").unwrap();
    let (collector, port) = udp_collector();

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .system_log(blocker.join("system.log").display().to_string())
        .syslog(Channel::System, true)
        .syslog_prot("udp")
        .syslog_host("127.0.0.1")
        .syslog_port(port.to_string())
        .init();

    let sinks = mlw.active_sinks(Channel::System);
    assert_eq!(sinks.len(), 1);
    assert!(sinks[0].starts_with("syslog:udp:"));

    // Error channel's file is unaffected
    assert!(mlw.active_sinks(Channel::Error)[0].starts_with("file:"));

    mlw.system_logger().print("still delivered");
    assert!(recv(&collector)
        .expect("datagram")
        .ends_with("still delivered"));
}

#[test]
fn test_unreachable_syslog_falls_back_to_discard() {
    let mlw = MultiLoggerBuilder::new()
        .syslog(Channel::Error, true)
        .syslog_prot("unix")
        .syslog_host("/nonexistent/syslog.sock")
        .init();

    assert_eq!(mlw.active_sinks(Channel::Error), vec!["discard".to_string()]);
    mlw.error_logger().print("discarded");
}

#[test]
fn test_save_and_restore_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.json");

    let builder = MultiLoggerBuilder::new()
        .defaults()
        .app_name("inventory")
        .enable_access(true)
        .flags_standard(false)
        .flags_utc(true)
        .flags_long_file(true)
        .syslog_prot("tcp")
        .syslog_host("logs.example.com")
        .syslog_port("514")
        .recovery_stack(true);
    builder.save_config(&path).expect("save");

    let restored = MultiLoggerBuilder::try_from_file(&path).expect("restore");
    assert_eq!(restored.settings(), builder.settings());
}

#[test]
fn test_initialized_config_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("saved.json");

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .init();
    mlw.save_config(&path).expect("save");

    let restored = MultiLoggerBuilder::from_file(&path);
    assert_eq!(restored.settings(), mlw.settings());
    assert_eq!(restored.config().log_flags, PerChannel::new(3, 0, 3));
    assert_eq!(restored.config().log_tags.system, "system ");

    // restoring and initializing again writes to the same files
    let again = restored.init();
    again.system_logger().print("second run");
    assert_eq!(read_lines(&temp_dir.path().join("log/system.log")).len(), 1);
}

#[test]
fn test_get_config_document_shape() {
    let json = MultiLoggerBuilder::new()
        .defaults()
        .get_config()
        .expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");

    assert_eq!(value["Options"]["LogFiles"]["System"], true);
    assert_eq!(value["Options"]["LogFiles"]["Access"], false);
    assert_eq!(value["Options"]["LogFlags"]["Standard"], true);
    assert_eq!(value["Config"]["LogFiles"]["Error"], "error.log");
    assert_eq!(value["Config"]["LogFlags"]["System"], 3);
    assert_eq!(value["Config"]["LogTags"]["Access"], "access");
}

#[test]
fn test_restore_missing_file_yields_usable_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let builder = MultiLoggerBuilder::from_file(temp_dir.path().join("missing.json"));

    assert_eq!(builder.settings(), &Settings::default());
    let mlw = builder.init();
    mlw.system_logger().print("nowhere");
}

#[test]
fn test_restore_malformed_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ \"Options\": ").unwrap();

    assert!(matches!(
        MultiLoggerBuilder::try_from_file(&path),
        Err(LoggerError::ConfigDocument { .. })
    ));
    assert_eq!(MultiLoggerBuilder::from_file(&path).settings(), &Settings::default());
}

#[test]
fn test_save_config_failure_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("no/such/dir/config.json");

    let result = MultiLoggerBuilder::new().defaults().save_config(&path);
    assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
}

#[test]
fn test_buffered_writer_requires_flush() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .init();
    let path = temp_dir.path().join("log/error.log");

    let mut buffered = mlw.error_buf_writer().clone();
    buffered.write_all(b"buffered line\n").unwrap();
    assert!(read_lines(&path).is_empty());

    mlw.flush().expect("flush");
    assert_eq!(read_lines(&path), vec!["buffered line".to_string()]);
}

#[test]
fn test_extra_sink_receives_after_builtin_sinks() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let memory = MemorySink::default();

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir(app_dir(&temp_dir))
        .add_sink(Channel::Access, memory.clone())
        .access_use_flags(true)
        .flags_standard(false)
        .flags_short_file(true)
        .init();

    assert_eq!(mlw.active_sinks(Channel::Access), vec!["memory".to_string()]);

    let line = line!() + 1;
    log!(mlw.access_logger(), "GET /devices {}", 200);

    assert_eq!(
        memory.contents(),
        format!("access integration_tests.rs:{}: GET /devices 200\n", line)
    );
}

#[test]
fn test_rooted_log_dir_used_as_is() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let rooted = temp_dir.path().join("var/log/app");

    let mlw = MultiLoggerBuilder::new()
        .defaults()
        .app_dir("/definitely/not/used")
        .log_dir(rooted.display().to_string())
        .init();

    mlw.error_logger().print("rooted");
    assert_eq!(read_lines(&rooted.join("error.log")).len(), 1);
}
