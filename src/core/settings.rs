//! Persisted configuration: the `Options` and `Config` sections
//!
//! This is the serializable half of the multiplexed logger. Runtime state
//! (open sinks, writers, loggers) never appears here.

use super::channel::{Channel, PerChannel};
use super::error::{LoggerError, Result};
use super::flags::LogFlags;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Default log directory name, resolved against the application directory.
pub const DEFAULT_LOG_DIR: &str = "log";

/// Shared formatting choices applied to every channel that opts in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FormatFlags {
    #[serde(rename = "UTC")]
    pub utc: bool,
    pub date: bool,
    pub time: bool,
    pub long_file: bool,
    pub short_file: bool,
    pub standard: bool,
}

impl FormatFlags {
    /// Derive the line header bitmask.
    ///
    /// `standard` yields exactly date and time regardless of the other
    /// fields. Otherwise each field contributes its bit; if a document
    /// carries both file forms, the short form wins.
    pub fn compose(&self) -> LogFlags {
        if self.standard {
            return LogFlags::STANDARD;
        }

        let mut flags = LogFlags::NONE;
        if self.utc {
            flags |= LogFlags::UTC;
        }
        if self.date {
            flags |= LogFlags::DATE;
        }
        if self.time {
            flags |= LogFlags::TIME;
        }
        if self.short_file {
            flags |= LogFlags::SHORT_FILE;
        } else if self.long_file {
            flags |= LogFlags::LONG_FILE;
        }
        flags
    }
}

/// Boolean toggles: which sinks each channel uses and how lines are decorated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Options {
    pub log_files: PerChannel<bool>,
    pub console: PerChannel<bool>,
    pub syslog: PerChannel<bool>,
    pub use_flags: PerChannel<bool>,
    pub log_flags: FormatFlags,
    pub recovery_stack: bool,
}

/// Remote syslog connection parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SyslogConfig {
    pub prot: String,
    pub host: String,
    pub port: String,
    pub tag: String,
}

impl SyslogConfig {
    /// `host:port` as handed to the network transports. An empty host
    /// means the local machine.
    pub fn remote_addr(&self) -> String {
        let host = match self.host.trim() {
            "" => "localhost",
            host => host,
        };
        format!("{}:{}", host, self.port)
    }
}

/// Names, paths, tags and the computed per-channel flag bitmasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    pub app_name: String,
    pub app_dir: String,
    pub log_dir: String,
    pub log_files: PerChannel<String>,
    pub log_flags: PerChannel<u32>,
    pub log_tags: PerChannel<String>,
    pub syslog: SyslogConfig,
}

/// The full structured document: exactly `Options` and `Config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub options: Options,
    pub config: Config,
}

impl Settings {
    /// Parse a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as a tab-indented JSON document.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|e| LoggerError::other(e.to_string()))
    }

    /// Read a configuration document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::config_document(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json)
            .map_err(|e| LoggerError::config_document(path.display().to_string(), e.to_string()))
    }

    /// Write the document to disk, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            LoggerError::io_operation(
                "saving configuration",
                format!("cannot write '{}'", path.display()),
                e,
            )
        })
    }

    /// Flag bitmask a channel's logger uses: the composed flags if the
    /// channel opted in, none otherwise.
    pub fn channel_flags(&self, channel: Channel) -> LogFlags {
        if *self.options.use_flags.get(channel) {
            self.options.log_flags.compose()
        } else {
            LogFlags::NONE
        }
    }
}

/// Trim a tag and give it exactly one trailing space; empty stays empty.
pub fn normalize_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{} ", trimmed)
    }
}

/// The single name a relative path consists of, ignoring `.` components
/// and trailing separators.
fn bare_name(path: &Path) -> Option<&OsStr> {
    let mut names = path.components().filter(|c| !matches!(c, Component::CurDir));
    match (names.next(), names.next()) {
        (Some(Component::Normal(name)), None) => Some(name),
        _ => None,
    }
}

/// Resolve the log directory against the application directory.
pub fn resolve_log_dir(app_dir: &Path, log_dir: &str) -> PathBuf {
    let log_dir = if log_dir.is_empty() {
        Path::new(DEFAULT_LOG_DIR)
    } else {
        Path::new(log_dir)
    };

    match bare_name(log_dir) {
        Some(name) => app_dir.join(name),
        None => log_dir.to_path_buf(),
    }
}

/// Resolve a channel's log file against the log directory.
pub fn resolve_log_file(log_dir: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    match bare_name(file) {
        Some(name) => log_dir.join(name),
        None => file.to_path_buf(),
    }
}

/// Directory holding the running executable.
pub fn default_app_dir() -> PathBuf {
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        return dir;
    }

    std::env::args()
        .next()
        .and_then(|arg0| Path::new(&arg0).parent().map(Path::to_path_buf))
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."))
}
