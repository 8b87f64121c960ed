//! Core multiplexed logger types and traits

pub mod call_site;
pub mod channel;
pub mod error;
pub mod fanout;
pub mod flags;
pub mod logger;
pub mod multi_logger;
pub mod settings;
pub mod sink;
pub mod timestamp;

pub use call_site::CallSite;
pub use channel::{Channel, ConsoleStream, PerChannel, SyslogSeverity};
pub use error::{LoggerError, Result};
pub use fanout::{BufferedChannelWriter, ChannelWriter, FanoutWriter};
pub use flags::{FileForm, LogFlags};
pub use logger::ChannelLogger;
pub use multi_logger::{MultiLogger, MultiLoggerBuilder};
pub use settings::{Config, FormatFlags, Options, Settings, SyslogConfig};
pub use sink::Sink;
