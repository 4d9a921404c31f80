/// Message and transport error types
use crate::header::MessageKind;
use thiserror::Error;

pub type MessageResult<T> = Result<T, MessageError>;

/// Failure reported by a [`Channel`](crate::transport::Channel)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel is closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("channel returned {returned} bytes for a {requested}-byte read")]
    Overread { requested: usize, returned: usize },
}

/// Errors raised while constructing, encoding, or decoding a message
///
/// Every decode error is fatal to that decode attempt only. The stream the
/// bytes came from should be considered desynchronized afterwards.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("failed to write message to channel: {0}")]
    TransportWrite(#[source] TransportError),

    #[error("failed to read message from channel: {0}")]
    TransportRead(#[source] TransportError),

    #[error("truncated message: `{field}` needs {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("malformed argument count {count} (allowed 0..={max})")]
    MalformedCount { count: i64, max: u32 },

    #[error("cannot allocate {requested} bytes for `{field}`")]
    AllocationFailure {
        field: &'static str,
        requested: usize,
    },

    #[error("`{field}` is {len} bytes, limit is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: u32,
    },

    #[error("`{field}` is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("unknown message kind tag {0:#04x}")]
    UnknownMessageKind(u8),

    #[error("expected {expected} message, found {found} message")]
    UnexpectedMessageKind {
        expected: MessageKind,
        found: MessageKind,
    },

    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

impl MessageError {
    /// Create a truncation error
    pub fn truncated(field: &'static str, needed: usize, available: usize) -> Self {
        Self::Truncated {
            field,
            needed,
            available,
        }
    }

    /// Create an allocation failure
    pub fn allocation(field: &'static str, requested: usize) -> Self {
        Self::AllocationFailure { field, requested }
    }

    /// True when the channel failed rather than the message itself.
    ///
    /// A dispatcher may retry these; anything else means the message must be
    /// rejected.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportWrite(_) | Self::TransportRead(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_error_messages() {
        assert_snapshot!(
            MessageError::truncated("procedure.name", 4, 2).to_string(),
            @"truncated message: `procedure.name` needs 4 bytes, 2 available"
        );
        assert_snapshot!(
            MessageError::MalformedCount { count: -1, max: 65535 }.to_string(),
            @"malformed argument count -1 (allowed 0..=65535)"
        );
        assert_snapshot!(
            MessageError::UnknownMessageKind(0x7a).to_string(),
            @"unknown message kind tag 0x7a"
        );
        assert_snapshot!(
            MessageError::UnexpectedMessageKind {
                expected: MessageKind::CallRequest,
                found: MessageKind::Ping,
            }
            .to_string(),
            @"expected call request message, found ping message"
        );
        assert_snapshot!(
            MessageError::TransportRead(TransportError::Overread {
                requested: 1,
                returned: 15,
            })
            .to_string(),
            @"failed to read message from channel: channel returned 15 bytes for a 1-byte read"
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(MessageError::TransportWrite(TransportError::Closed).is_transport());
        assert!(!MessageError::TrailingBytes(3).is_transport());
    }
}
