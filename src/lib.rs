//! # Rust Multilog
//!
//! Three independent log channels (System, Access, Error), each fanned out
//! to any combination of an append-only file, the console and a syslog
//! collector.
//!
//! ## Features
//!
//! - **Multiplexed Channels**: per-channel sink selection, tag and header flags
//! - **Partial-Failure Tolerance**: a sink that cannot be opened is skipped,
//!   a channel without sinks discards its output
//! - **Locked Configuration**: a consuming builder turns into a read-only logger
//! - **Persistable**: the whole configuration round-trips through a JSON document
//!
//! ## Example
//!
//! ```no_run
//! use rust_multilog::prelude::*;
//!
//! let mlw = MultiLoggerBuilder::from_file("config.json").init();
//! mlw.system_logger().print("service started");
//! mlw.error_logger().print("device not found");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        BufferedChannelWriter, Channel, ChannelLogger, ChannelWriter, Config, FormatFlags,
        LogFlags, LoggerError, MultiLogger, MultiLoggerBuilder, Options, PerChannel, Result,
        Settings, Sink, SyslogConfig,
    };
    pub use crate::sinks::{ConsoleSink, DiscardSink, FileSink, SyslogSink};
}

pub use core::{
    BufferedChannelWriter, CallSite, Channel, ChannelLogger, ChannelWriter, Config, FormatFlags,
    LogFlags, LoggerError, MultiLogger, MultiLoggerBuilder, Options, PerChannel, Result,
    Settings, Sink, SyslogConfig,
};
pub use sinks::{ConsoleSink, DiscardSink, FileSink, SinkFactory, SyslogSink};
