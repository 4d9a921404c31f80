//! Byte channel between host and container
//!
//! The codec only needs `write` and `read`; how the bytes move (socket, pipe,
//! shared memory) is the channel's business.

use crate::error::TransportError;
use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Byte-oriented transport
pub trait Channel {
    /// Accept all of `bytes` or fail
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Read up to `n` bytes. Fewer than `n` means the stream ended.
    fn read(&mut self, n: usize) -> Result<Vec<u8>, TransportError>;
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn read(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read(n)
    }
}

/// Adapts any `std::io` stream (socket, pipe, file) into a [`Channel`]
#[derive(Debug)]
pub struct IoChannel<T> {
    inner: T,
}

impl<T> IoChannel<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> Channel for IoChannel<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.inner.write_all(bytes).map_err(classify)?;
        self.inner.flush().map_err(classify)
    }

    fn read(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        // Grows with the bytes that actually arrive, never sized from `n`
        let mut buf = Vec::new();
        Read::take(&mut self.inner, n as u64)
            .read_to_end(&mut buf)
            .map_err(classify)?;
        Ok(buf)
    }
}

fn classify(err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => TransportError::Closed,
        _ => TransportError::Io(err),
    }
}

/// In-process loopback channel
///
/// Bytes written are read back in order. After `close`, writes fail with
/// `TransportError::Closed` while already buffered bytes stay readable.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    buffer: VecDeque<u8>,
    closed: bool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel pre-loaded with bytes to read
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: VecDeque::from(bytes.into()),
            closed: false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes waiting to be read
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Channel for MemoryChannel {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.buffer.extend(bytes);
        Ok(())
    }

    fn read(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        let take = n.min(self.buffer.len());
        Ok(self.buffer.drain(..take).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_memory_channel_fifo() {
        let mut channel = MemoryChannel::new();
        channel.write(b"abc").unwrap();
        channel.write(b"de").unwrap();

        assert_eq!(channel.read(4).unwrap(), b"abcd".to_vec());
        assert_eq!(channel.read(4).unwrap(), b"e".to_vec());
        assert!(channel.read(1).unwrap().is_empty());
    }

    #[test]
    fn test_memory_channel_closed() {
        let mut channel = MemoryChannel::from_bytes(b"xy".to_vec());
        channel.close();

        assert!(matches!(channel.write(b"z"), Err(TransportError::Closed)));
        assert_eq!(channel.read(2).unwrap(), b"xy".to_vec());
    }

    #[test]
    fn test_io_channel_short_read_at_eof() {
        let mut channel = IoChannel::new(Cursor::new(b"hello".to_vec()));
        assert_eq!(channel.read(3).unwrap(), b"hel".to_vec());
        assert_eq!(channel.read(100).unwrap(), b"lo".to_vec());
    }

    #[test]
    fn test_io_channel_write() {
        let mut channel = IoChannel::new(Cursor::new(Vec::new()));
        channel.write(b"abc").unwrap();
        assert_eq!(channel.into_inner().into_inner(), b"abc".to_vec());
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_errors_classified_as_closed() {
        let mut channel = IoChannel::new(BrokenPipe);
        assert!(matches!(channel.write(b"a"), Err(TransportError::Closed)));
        assert!(matches!(channel.read(1), Err(TransportError::Closed)));
    }
}
