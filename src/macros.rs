//! Logging macros for ergonomic log message formatting.
//!
//! # Examples
//!
//! ```
//! use rust_multilog::prelude::*;
//! use rust_multilog::log;
//!
//! let mlw = MultiLoggerBuilder::new().init();
//! let logger = mlw.system_logger();
//!
//! log!(logger, "Server started");
//!
//! let port = 8080;
//! log!(logger, "Server listening on port {}", port);
//! ```

/// Write a formatted line to a channel logger.
///
/// The caller location recorded in the line header (when the channel's
/// flags ask for it) is the macro invocation site.
#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.print_fmt(format_args!($($arg)+))
    };
}

/// Prefix an error (anything `Display`) with the invoking file, line and
/// module, producing a `String`.
///
/// # Examples
///
/// ```
/// use rust_multilog::decorate;
///
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
/// let message = decorate!(err);
/// assert!(message.ends_with("(): missing"));
/// ```
#[macro_export]
macro_rules! decorate {
    ($err:expr) => {
        $crate::core::CallSite::new(file!(), line!(), module_path!()).decorate(&$err)
    };
}
