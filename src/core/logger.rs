//! Line-oriented channel logger

use super::fanout::ChannelWriter;
use super::flags::{FileForm, LogFlags};
use super::timestamp;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::panic::Location;
use std::path::Path;

/// Formats lines for one channel and hands each to the channel writer in a
/// single write.
///
/// Line layout: `TAG DATE TIME FILE:LINE: MESSAGE\n`, where everything but
/// the message is controlled by the tag and the flag bitmask. Tags are
/// used verbatim; the multiplexed logger hands over tags ending in exactly
/// one space, or an empty tag, which leaves no leading gap.
///
/// # Example
///
/// ```
/// use rust_multilog::core::{ChannelLogger, ChannelWriter, LogFlags};
///
/// let logger = ChannelLogger::new(ChannelWriter::discard(), "audit ", LogFlags::STANDARD);
/// logger.print("user logged in");
/// ```
#[derive(Clone)]
pub struct ChannelLogger {
    writer: ChannelWriter,
    tag: String,
    flags: LogFlags,
}

impl ChannelLogger {
    pub fn new(writer: ChannelWriter, tag: impl Into<String>, flags: LogFlags) -> Self {
        Self {
            writer,
            tag: tag.into(),
            flags,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn flags(&self) -> LogFlags {
        self.flags
    }

    pub fn writer(&self) -> &ChannelWriter {
        &self.writer
    }

    /// Render a complete line, newline-terminated.
    pub fn format_line(&self, location: &Location<'_>, now: DateTime<Utc>, message: &str) -> String {
        let mut line = String::with_capacity(self.tag.len() + message.len() + 48);
        line.push_str(&self.tag);

        timestamp::write_clock(&mut line, self.flags, now);

        match self.flags.file_form() {
            Some(FileForm::Long) => {
                let _ = write!(line, "{}:{}: ", location.file(), location.line());
            }
            Some(FileForm::Short) => {
                let file = Path::new(location.file())
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(location.file());
                let _ = write!(line, "{}:{}: ", file, location.line());
            }
            None => {}
        }

        line.push_str(message);
        if !message.ends_with('\n') {
            line.push('\n');
        }
        line
    }

    /// Write one line attributed to `location`.
    pub fn output(&self, location: &Location<'_>, message: &str) -> io::Result<()> {
        let line = self.format_line(location, Utc::now(), message);
        (&self.writer).write_all(line.as_bytes())
    }

    /// Write one line attributed to the caller.
    ///
    /// Sink failures are reported on stderr and otherwise ignored.
    #[track_caller]
    pub fn print(&self, message: impl AsRef<str>) {
        let location = Location::caller();
        if let Err(e) = self.output(location, message.as_ref()) {
            eprintln!("[LOGGER ERROR] Write to '{}' logger failed: {}", self.tag.trim(), e);
        }
    }

    /// Formatted variant of [`print`](Self::print); used by the `log!` macro.
    #[track_caller]
    pub fn print_fmt(&self, args: fmt::Arguments<'_>) {
        let location = Location::caller();
        let message = match args.as_str() {
            Some(s) => std::borrow::Cow::Borrowed(s),
            None => std::borrow::Cow::Owned(args.to_string()),
        };
        if let Err(e) = self.output(location, &message) {
            eprintln!("[LOGGER ERROR] Write to '{}' logger failed: {}", self.tag.trim(), e);
        }
    }
}

impl fmt::Debug for ChannelLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelLogger")
            .field("tag", &self.tag)
            .field("flags", &self.flags)
            .field("sinks", &self.writer.sink_names())
            .finish()
    }
}
