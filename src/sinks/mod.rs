//! Sink implementations

pub mod console;
pub mod discard;
pub mod factory;
pub mod file;
pub mod syslog;

pub use console::ConsoleSink;
pub use discard::DiscardSink;
pub use factory::SinkFactory;
pub use file::{FileSink, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
pub use syslog::{SyslogPriority, SyslogSink, SyslogTransport, FACILITY_LOCAL7};

// Re-export the trait alongside its implementations
pub use crate::core::Sink;
