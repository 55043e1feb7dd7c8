//! Wire primitives.
//!
//! Fixed-width, big-endian reads and writes over `bytes` buffers. Readers
//! never panic on short input: every read checks the remaining length first
//! and reports a [`WireError::Truncated`] instead.
//!
//! Frame layout handled by higher layers:
//!
//! ```text
//! ┌──────────────┬──────────────────────┬──────────────────────┐
//! │ type id (u32)│ header (12 bytes)    │ command fields        │
//! └──────────────┴──────────────────────┴──────────────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::commands::CommandTypeId;

/// Errors raised while encoding or decoding command frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remained than the next field requires.
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    /// Bytes were left over after a single-command frame was decoded.
    #[error("{0} trailing bytes after command")]
    TrailingBytes(usize),
    /// No decoder is registered for the type id.
    #[error("unknown command type {0}")]
    UnknownCommandType(CommandTypeId),
    /// A second decoder was registered for an id already in use.
    #[error("command type {0} registered twice")]
    DuplicateCommandType(CommandTypeId),
    /// A command-kind ordinal does not fit in the 24 bits reserved for it.
    #[error("command ordinal {0:#x} exceeds 24 bits")]
    OrdinalOutOfRange(u32),
}

/// Append-only writer for outbound frames.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.put_f32(v);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Freezes the written bytes into an immutable frame.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Cursor over an inbound frame.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), WireError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(WireError::Truncated { needed, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        self.ensure(4)?;
        Ok(self.buf.get_f32())
    }
}
