//! Primitive wire encoding shared by every message in the family
//!
//! Integers are fixed-width big-endian. Text is a `u32` byte length followed
//! by the raw bytes, so embedded NUL bytes survive the trip.

use crate::error::{MessageError, MessageResult, TransportError};
use crate::limits::Limits;
use crate::transport::Channel;
use tracing::warn;

/// Something decode can pull exact byte counts from
pub(crate) trait ByteSource {
    /// Fill `buf` completely or fail with `Truncated`
    fn fill(&mut self, buf: &mut [u8], field: &'static str) -> MessageResult<()>;

    /// Take `n` bytes into a freshly owned buffer
    fn take(&mut self, n: usize, field: &'static str) -> MessageResult<Vec<u8>>;

    /// Bytes known to be left, when the source can tell
    fn remaining_hint(&self) -> Option<usize> {
        None
    }
}

/// Largest single read handed to a channel
const READ_CHUNK: usize = 64 * 1024;

/// Reads from an in-memory buffer without ever borrowing past the call
pub(crate) struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn window(&mut self, n: usize, field: &'static str) -> MessageResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(MessageError::truncated(field, n, self.remaining()));
        }
        let bytes: &'a [u8] = self.bytes;
        let window = &bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(window)
    }
}

impl ByteSource for SliceSource<'_> {
    fn fill(&mut self, buf: &mut [u8], field: &'static str) -> MessageResult<()> {
        let window = self.window(buf.len(), field)?;
        buf.copy_from_slice(window);
        Ok(())
    }

    fn take(&mut self, n: usize, field: &'static str) -> MessageResult<Vec<u8>> {
        // Bounds are checked before anything is allocated
        let window = self.window(n, field)?;
        let mut owned = Vec::new();
        owned
            .try_reserve_exact(n)
            .map_err(|_| MessageError::allocation(field, n))?;
        owned.extend_from_slice(window);
        Ok(owned)
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.remaining())
    }
}

/// Reads field by field from a transport channel
pub(crate) struct ChannelSource<'c, C: Channel + ?Sized> {
    channel: &'c mut C,
}

impl<'c, C: Channel + ?Sized> ChannelSource<'c, C> {
    pub(crate) fn new(channel: &'c mut C) -> Self {
        Self { channel }
    }
}

impl<C: Channel + ?Sized> ByteSource for ChannelSource<'_, C> {
    fn fill(&mut self, buf: &mut [u8], field: &'static str) -> MessageResult<()> {
        let bytes = self.take(buf.len(), field)?;
        buf.copy_from_slice(&bytes);
        Ok(())
    }

    fn take(&mut self, n: usize, field: &'static str) -> MessageResult<Vec<u8>> {
        // Memory grows with the bytes that arrive, not with the length claimed
        let mut owned = Vec::new();
        while owned.len() < n {
            let want = (n - owned.len()).min(READ_CHUNK);
            let chunk = self
                .channel
                .read(want)
                .map_err(MessageError::TransportRead)?;
            if chunk.len() > want {
                return Err(MessageError::TransportRead(TransportError::Overread {
                    requested: want,
                    returned: chunk.len(),
                }));
            }
            owned
                .try_reserve(chunk.len())
                .map_err(|_| MessageError::allocation(field, n))?;
            owned.extend_from_slice(&chunk);
            if chunk.len() < want {
                return Err(MessageError::truncated(field, n, owned.len()));
            }
        }
        Ok(owned)
    }
}

pub(crate) fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

pub(crate) fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write a length-prefixed text field
pub(crate) fn write_text(
    out: &mut Vec<u8>,
    field: &'static str,
    text: &str,
    limits: &Limits,
) -> MessageResult<()> {
    let bytes = text.as_bytes();
    if bytes.len() > limits.max_field_bytes() as usize {
        return Err(MessageError::FieldTooLong {
            field,
            len: bytes.len(),
            max: limits.max_field_bytes(),
        });
    }
    out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

pub(crate) fn read_u8<S: ByteSource>(src: &mut S, field: &'static str) -> MessageResult<u8> {
    let mut buf = [0u8; 1];
    src.fill(&mut buf, field)?;
    Ok(buf[0])
}

pub(crate) fn read_u32<S: ByteSource>(src: &mut S, field: &'static str) -> MessageResult<u32> {
    let mut buf = [0u8; 4];
    src.fill(&mut buf, field)?;
    Ok(u32::from_be_bytes(buf))
}

pub(crate) fn read_i32<S: ByteSource>(src: &mut S, field: &'static str) -> MessageResult<i32> {
    let mut buf = [0u8; 4];
    src.fill(&mut buf, field)?;
    Ok(i32::from_be_bytes(buf))
}

/// Read a length-prefixed text field into an owned `String`
pub(crate) fn read_text<S: ByteSource>(
    src: &mut S,
    field: &'static str,
    limits: &Limits,
) -> MessageResult<String> {
    let len = read_u32(src, field)?;
    if len > limits.max_field_bytes() {
        warn!(field, len, max = limits.max_field_bytes(), "rejecting oversized text field");
        return Err(MessageError::FieldTooLong {
            field,
            len: len as usize,
            max: limits.max_field_bytes(),
        });
    }
    let bytes = src.take(len as usize, field)?;
    String::from_utf8(bytes).map_err(|_| MessageError::InvalidUtf8 { field })
}
