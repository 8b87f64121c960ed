//! Discard sink

use crate::core::Sink;
use std::io::{self, Write};

/// Accepts every write and drops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl Write for DiscardSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for DiscardSink {
    fn name(&self) -> &str {
        "discard"
    }
}
