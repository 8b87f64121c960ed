//! Sink factory: opens one physical destination at a time

use super::{ConsoleSink, FileSink, SyslogPriority, SyslogSink, SyslogTransport};
use super::file::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};
use super::syslog::FACILITY_LOCAL7;
use crate::core::{Channel, Result, Sink, SyslogConfig};
use std::path::Path;

/// Everything needed to open sinks, passed in explicitly rather than read
/// from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkFactory {
    pub file_mode: u32,
    pub dir_mode: u32,
    pub syslog_facility: u8,
    pub syslog: SyslogConfig,
}

impl Default for SinkFactory {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            syslog_facility: FACILITY_LOCAL7,
            syslog: SyslogConfig::default(),
        }
    }
}

impl SinkFactory {
    pub fn new(syslog: SyslogConfig) -> Self {
        Self {
            syslog,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_modes(mut self, file_mode: u32, dir_mode: u32) -> Self {
        self.file_mode = file_mode;
        self.dir_mode = dir_mode;
        self
    }

    /// Append-mode file, creating parent directories as needed.
    pub fn open_file(&self, path: &Path) -> Result<Box<dyn Sink>> {
        let sink = FileSink::open_with_modes(path, self.file_mode, self.dir_mode)?;
        Ok(Box::new(sink))
    }

    /// The console stream conventionally used by `channel`.
    pub fn console(&self, channel: Channel) -> Box<dyn Sink> {
        Box::new(ConsoleSink::new(channel.console_stream()))
    }

    /// Syslog connection at the severity conventionally used by `channel`.
    pub fn open_syslog(&self, channel: Channel) -> Result<Box<dyn Sink>> {
        let transport: SyslogTransport = self.syslog.prot.parse()?;
        let address = match transport {
            SyslogTransport::Unix => self.syslog.host.clone(),
            _ => self.syslog.remote_addr(),
        };
        let priority = SyslogPriority::new(self.syslog_facility, channel.syslog_severity());
        let sink = SyslogSink::dial(transport, &address, priority, self.syslog.tag.clone())?;
        Ok(Box::new(sink))
    }
}
