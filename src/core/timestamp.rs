//! Date and time fields of a log line header
//!
//! Layout follows the classic line-logger header: `2009/01/23 01:23:23.123123 `.
//! Each field is followed by a single space; absent fields leave no gap.

use super::flags::LogFlags;
use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y/%m/%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const MICROS_FORMAT: &str = "%H:%M:%S%.6f";

/// Whether `flags` ask for any clock field.
pub fn has_clock(flags: LogFlags) -> bool {
    flags.contains(LogFlags::DATE)
        || flags.contains(LogFlags::TIME)
        || flags.contains(LogFlags::MICROSECONDS)
}

/// Append the date/time fields selected by `flags` for instant `now`.
///
/// `now` is rendered in UTC when `LogFlags::UTC` is set and in the local
/// time zone otherwise.
pub fn write_clock(buf: &mut String, flags: LogFlags, now: DateTime<Utc>) {
    if !has_clock(flags) {
        return;
    }

    if flags.contains(LogFlags::UTC) {
        write_fields(buf, flags, &now);
    } else {
        write_fields(buf, flags, &now.with_timezone(&Local));
    }
}

fn write_fields<Tz>(buf: &mut String, flags: LogFlags, at: &DateTime<Tz>)
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if flags.contains(LogFlags::DATE) {
        let _ = write!(buf, "{} ", at.format(DATE_FORMAT));
    }
    if flags.contains(LogFlags::MICROSECONDS) {
        let _ = write!(buf, "{} ", at.format(MICROS_FORMAT));
    } else if flags.contains(LogFlags::TIME) {
        let _ = write!(buf, "{} ", at.format(TIME_FORMAT));
    }
}
