//! Base message header shared by the PL/Container message family
//!
//! Every message starts with a single tag byte naming its kind. The call
//! request codec only ever produces `CallRequest`, but decoding recognises the
//! whole family so a desynchronized stream is reported as such instead of
//! being misread as a garbage call request.

use crate::error::{MessageError, MessageResult};
use crate::wire::{read_u8, write_u8, ByteSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of message carried on a host/container channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Ping,
    CallRequest,
    Result,
    Exception,
    Sql,
    Log,
}

impl MessageKind {
    /// Wire tag byte
    pub const fn tag(self) -> u8 {
        match self {
            MessageKind::Ping => b'P',
            MessageKind::CallRequest => b'C',
            MessageKind::Result => b'R',
            MessageKind::Exception => b'E',
            MessageKind::Sql => b'S',
            MessageKind::Log => b'L',
        }
    }

    /// Map a tag byte back to its kind
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'P' => Some(MessageKind::Ping),
            b'C' => Some(MessageKind::CallRequest),
            b'R' => Some(MessageKind::Result),
            b'E' => Some(MessageKind::Exception),
            b'S' => Some(MessageKind::Sql),
            b'L' => Some(MessageKind::Log),
            _ => None,
        }
    }

    /// Look at the first byte of an encoded message without consuming it.
    ///
    /// Lets a dispatcher route a buffer before picking a decoder.
    pub fn peek(bytes: &[u8]) -> MessageResult<Self> {
        let tag = *bytes
            .first()
            .ok_or_else(|| MessageError::truncated("header.kind", 1, 0))?;
        MessageKind::try_from(tag)
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = MessageError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        MessageKind::from_tag(tag).ok_or(MessageError::UnknownMessageKind(tag))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Ping => "ping",
            MessageKind::CallRequest => "call request",
            MessageKind::Result => "result",
            MessageKind::Exception => "exception",
            MessageKind::Sql => "sql",
            MessageKind::Log => "log",
        };
        f.write_str(name)
    }
}

/// Common header carried by every message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHeader {
    pub kind: MessageKind,
}

impl MessageHeader {
    /// Encoded size in bytes
    pub const ENCODED_LEN: usize = 1;

    pub const fn new(kind: MessageKind) -> Self {
        Self { kind }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        write_u8(out, self.kind.tag());
    }

    pub(crate) fn decode<S: ByteSource>(src: &mut S) -> MessageResult<Self> {
        let tag = read_u8(src, "header.kind")?;
        Ok(Self::new(MessageKind::try_from(tag)?))
    }

    /// Fail unless this header announces `expected`
    pub fn expect(&self, expected: MessageKind) -> MessageResult<()> {
        if self.kind != expected {
            return Err(MessageError::UnexpectedMessageKind {
                expected,
                found: self.kind,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::SliceSource;
    use rstest::rstest;

    #[rstest]
    #[case(MessageKind::Ping, b'P')]
    #[case(MessageKind::CallRequest, b'C')]
    #[case(MessageKind::Result, b'R')]
    #[case(MessageKind::Exception, b'E')]
    #[case(MessageKind::Sql, b'S')]
    #[case(MessageKind::Log, b'L')]
    fn test_tag_mapping(#[case] kind: MessageKind, #[case] tag: u8) {
        assert_eq!(kind.tag(), tag);
        assert_eq!(MessageKind::from_tag(tag), Some(kind));

        let mut out = Vec::new();
        MessageHeader::new(kind).encode(&mut out);
        assert_eq!(out, vec![tag]);
    }

    #[test]
    fn test_unknown_tag() {
        let mut src = SliceSource::new(&[0x00]);
        let err = MessageHeader::decode(&mut src).unwrap_err();
        assert!(matches!(err, MessageError::UnknownMessageKind(0)));
    }

    #[test]
    fn test_peek_empty_buffer() {
        let err = MessageKind::peek(&[]).unwrap_err();
        assert!(matches!(err, MessageError::Truncated { needed: 1, .. }));
    }

    #[test]
    fn test_expect_kind() {
        let header = MessageHeader::new(MessageKind::Sql);
        assert!(header.expect(MessageKind::Sql).is_ok());
        assert!(matches!(
            header.expect(MessageKind::CallRequest),
            Err(MessageError::UnexpectedMessageKind {
                expected: MessageKind::CallRequest,
                found: MessageKind::Sql
            })
        ));
    }
}
