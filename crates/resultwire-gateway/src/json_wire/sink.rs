//! Buffered document sink
//!
//! A `BytesMut` buffer paired with a [`JsonGenerator`] writing into it. Nothing
//! leaves the sink until [`JsonSink::finish`] succeeds, at which point the
//! buffer is frozen into a `Bytes` payload without copying. Dropping the sink
//! (or calling [`JsonSink::discard`]) releases both buffer and generator, so a
//! half-written document can never escape.

use bytes::{Bytes, BytesMut};
use std::io::{self, Write};

use super::config::JsonWireConfig;
use super::generator::JsonGenerator;

/// Growable in-memory buffer with an optional hard size limit
///
/// Writes past the limit fail with `ErrorKind::OutOfMemory`, which surfaces as
/// a generation failure rather than a value failure.
#[derive(Debug)]
pub struct PayloadBuffer {
    buffer: BytesMut,
    limit: Option<usize>,
}

impl PayloadBuffer {
    /// `max_bytes == 0` means unlimited
    pub fn new(initial_capacity: usize, max_bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(initial_capacity),
            limit: (max_bytes > 0).then_some(max_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Freeze the written bytes - zero copy
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }
}

impl Write for PayloadBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.limit {
            if self.buffer.len() + buf.len() > limit {
                return Err(io::Error::new(
                    io::ErrorKind::OutOfMemory,
                    format!("JSON payload exceeds limit of {} bytes", limit),
                ));
            }
        }
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Scoped buffer + generator owned by a single produce call
pub struct JsonSink {
    generator: JsonGenerator<PayloadBuffer>,
}

impl JsonSink {
    pub fn acquire(config: &JsonWireConfig) -> Self {
        let buffer = PayloadBuffer::new(config.initial_buffer_bytes, config.max_payload_bytes);
        Self {
            generator: JsonGenerator::new(buffer),
        }
    }

    pub fn generator(&mut self) -> &mut JsonGenerator<PayloadBuffer> {
        &mut self.generator
    }

    /// Flush and hand out the finished document
    ///
    /// Fails if the document was left open; the bytes are dropped in that case.
    pub fn finish(mut self) -> io::Result<Bytes> {
        self.generator.flush()?;
        if !self.generator.is_complete() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "JSON document incomplete ({} open scopes)",
                    self.generator.depth()
                ),
            ));
        }
        Ok(self.generator.into_inner().freeze())
    }

    /// Drop whatever was written; returns the number of bytes thrown away
    pub fn discard(self) -> usize {
        self.generator.into_inner().len()
    }
}
