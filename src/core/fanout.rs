//! Fan-out writers that duplicate every write across a channel's sinks

use super::sink::Sink;
use crate::sinks::DiscardSink;
use parking_lot::Mutex;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

/// Ordered list of sinks receiving identical bytes.
///
/// Every sink is attempted on every call. The first failure is reported
/// after the remaining sinks have been written; bytes already accepted by
/// other sinks are not rolled back.
pub struct FanoutWriter {
    sinks: Vec<Box<dyn Sink>>,
}

impl FanoutWriter {
    /// Build from the opened sinks, substituting a discard sink when empty.
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        if sinks.is_empty() {
            Self::discard()
        } else {
            Self { sinks }
        }
    }

    pub fn discard() -> Self {
        Self {
            sinks: vec![Box::new(DiscardSink)],
        }
    }

    /// Sink names, in write order.
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.name().to_string()).collect()
    }

    fn for_each_sink(
        &mut self,
        mut op: impl FnMut(&mut Box<dyn Sink>) -> io::Result<()>,
    ) -> io::Result<()> {
        let mut first_err: Option<io::Error> = None;

        for sink in self.sinks.iter_mut() {
            if let Err(e) = op(sink) {
                let e = io::Error::new(e.kind(), format!("{} sink: {}", sink.name(), e));
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Write for FanoutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.for_each_sink(|sink| sink.write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.for_each_sink(|sink| sink.flush())
    }
}

/// Shared, serialized handle to one channel's fan-out writer.
///
/// Each `write` call holds the channel lock for its whole duration, so a
/// line written in one call is never interleaved with another writer's.
#[derive(Clone)]
pub struct ChannelWriter {
    inner: Arc<Mutex<FanoutWriter>>,
}

impl ChannelWriter {
    pub fn new(fanout: FanoutWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fanout)),
        }
    }

    /// A writer that drops everything.
    pub fn discard() -> Self {
        Self::new(FanoutWriter::discard())
    }

    pub fn sink_names(&self) -> Vec<String> {
        self.inner.lock().sink_names()
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (&*self).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

impl Write for &ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// Buffered variant of a channel writer.
///
/// Data reaches the sinks when the buffer fills or on an explicit
/// `flush`; callers must flush before exit to guarantee delivery.
#[derive(Clone)]
pub struct BufferedChannelWriter {
    inner: Arc<Mutex<BufWriter<ChannelWriter>>>,
}

impl BufferedChannelWriter {
    pub fn new(writer: ChannelWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufWriter::new(writer))),
        }
    }

    pub fn with_capacity(capacity: usize, writer: ChannelWriter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufWriter::with_capacity(capacity, writer))),
        }
    }

    /// Bytes currently held in the buffer.
    pub fn buffered(&self) -> usize {
        self.inner.lock().buffer().len()
    }
}

impl Write for BufferedChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self).write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (&*self).write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self).flush()
    }
}

impl Write for &BufferedChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
