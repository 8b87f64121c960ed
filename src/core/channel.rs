//! Logical log channels and per-channel values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three independent log streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    System,
    Access,
    Error,
}

/// Physical console stream a channel writes to when console output is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Syslog severity used for a channel's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogSeverity {
    Error = 3,
    Info = 6,
}

impl Channel {
    /// All channels, in the order sinks are opened for them.
    pub const ALL: [Channel; 3] = [Channel::System, Channel::Access, Channel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            Channel::System => "System",
            Channel::Access => "Access",
            Channel::Error => "Error",
        }
    }

    pub fn console_stream(&self) -> ConsoleStream {
        match self {
            Channel::System | Channel::Access => ConsoleStream::Stdout,
            Channel::Error => ConsoleStream::Stderr,
        }
    }

    pub fn syslog_severity(&self) -> SyslogSeverity {
        match self {
            Channel::System | Channel::Access => SyslogSeverity::Info,
            Channel::Error => SyslogSeverity::Error,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Channel::System),
            "access" => Ok(Channel::Access),
            "error" => Ok(Channel::Error),
            _ => Err(format!("Invalid channel: '{}'", s)),
        }
    }
}

/// A value held once per channel.
///
/// Serializes as `{"System": .., "Access": .., "Error": ..}`; missing
/// entries take `T::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct PerChannel<T> {
    pub system: T,
    pub access: T,
    pub error: T,
}

impl<T> PerChannel<T> {
    pub fn new(system: T, access: T, error: T) -> Self {
        Self {
            system,
            access,
            error,
        }
    }

    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::System => &self.system,
            Channel::Access => &self.access,
            Channel::Error => &self.error,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut T {
        match channel {
            Channel::System => &mut self.system,
            Channel::Access => &mut self.access,
            Channel::Error => &mut self.error,
        }
    }

    /// Build a value for every channel from a function of the channel.
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            system: f(Channel::System),
            access: f(Channel::Access),
            error: f(Channel::Error),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Channel, T) -> U) -> PerChannel<U> {
        PerChannel {
            system: f(Channel::System, self.system),
            access: f(Channel::Access, self.access),
            error: f(Channel::Error, self.error),
        }
    }
}

impl<T: Clone> PerChannel<T> {
    pub fn set_all(&mut self, value: T) {
        self.system = value.clone();
        self.access = value.clone();
        self.error = value;
    }
}
