//! Sink trait for physical log destinations

use std::io::Write;

/// A physical destination for log lines.
///
/// Sinks are plain byte writers; formatting happens in the channel logger.
pub trait Sink: Write + Send {
    fn name(&self) -> &str;
}

impl Sink for Box<dyn Sink> {
    fn name(&self) -> &str {
        (**self).name()
    }
}
