//! Line header flag bitmask
//!
//! Bit values follow the classic line-logger convention so that numbers
//! stored in configuration documents stay interchangeable with other tools
//! using the same scheme.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of metadata fields prepended to every log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogFlags(u32);

impl LogFlags {
    /// No header fields; tag only.
    pub const NONE: LogFlags = LogFlags(0);
    /// Calendar date: `2009/01/23`
    pub const DATE: LogFlags = LogFlags(1);
    /// Time of day: `01:23:23`
    pub const TIME: LogFlags = LogFlags(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`, implies TIME
    pub const MICROSECONDS: LogFlags = LogFlags(1 << 2);
    /// Full caller path and line: `/a/b/c/main.rs:23`
    pub const LONG_FILE: LogFlags = LogFlags(1 << 3);
    /// Caller file name and line: `main.rs:23`, overrides LONG_FILE
    pub const SHORT_FILE: LogFlags = LogFlags(1 << 4);
    /// Render date and time in UTC rather than local time
    pub const UTC: LogFlags = LogFlags(1 << 5);
    /// Canonical combination: date and time, no caller info
    pub const STANDARD: LogFlags = LogFlags(Self::DATE.0 | Self::TIME.0);

    const ALL_BITS: u32 = 0b11_1111;

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, discarding unknown ones.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        LogFlags(bits & Self::ALL_BITS)
    }

    #[must_use]
    pub const fn contains(self, other: LogFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn union(self, other: LogFlags) -> Self {
        LogFlags(self.0 | other.0)
    }

    /// Whether the header carries caller location, and in which form.
    pub fn file_form(self) -> Option<FileForm> {
        if self.contains(Self::SHORT_FILE) {
            Some(FileForm::Short)
        } else if self.contains(Self::LONG_FILE) {
            Some(FileForm::Long)
        } else {
            None
        }
    }
}

/// How the caller location is rendered in a line header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileForm {
    Long,
    Short,
}

impl BitOr for LogFlags {
    type Output = LogFlags;

    fn bitor(self, rhs: LogFlags) -> LogFlags {
        self.union(rhs)
    }
}

impl BitOrAssign for LogFlags {
    fn bitor_assign(&mut self, rhs: LogFlags) {
        *self = self.union(rhs);
    }
}

impl From<LogFlags> for u32 {
    fn from(flags: LogFlags) -> u32 {
        flags.0
    }
}

impl From<u32> for LogFlags {
    fn from(bits: u32) -> LogFlags {
        LogFlags::from_bits_truncate(bits)
    }
}

impl fmt::Display for LogFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(LogFlags, &str); 6] = [
            (LogFlags::DATE, "DATE"),
            (LogFlags::TIME, "TIME"),
            (LogFlags::MICROSECONDS, "MICROSECONDS"),
            (LogFlags::LONG_FILE, "LONG_FILE"),
            (LogFlags::SHORT_FILE, "SHORT_FILE"),
            (LogFlags::UTC, "UTC"),
        ];

        if self.is_empty() {
            return write!(f, "NONE");
        }

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(" | "))
    }
}
