//! Call request message
//!
//! A `CallRequest` asks a container to run a procedure with bound arguments.
//! The value owns its whole tree: the procedure's two text buffers and every
//! argument's three. Nothing in the tree is shared, and the argument count is
//! always the length of the owned argument vector.

use crate::codec;
use crate::error::{MessageError, MessageResult};
use crate::header::{MessageHeader, MessageKind};
use crate::limits::Limits;
use crate::teardown::Released;
use crate::transport::Channel;
use crate::wire::{ChannelSource, SliceSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body and identifier of the routine to invoke
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Procedure {
    /// Source code of the procedure
    pub source: String,
    /// Name of the procedure
    pub name: String,
}

impl Procedure {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }

    pub(crate) fn teardown(self) -> Released {
        drop(self.source);
        drop(self.name);
        Released {
            arguments: 0,
            text_buffers: 2,
        }
    }
}

/// One bound parameter
///
/// The value always travels as text; `type_name` tells the container how to
/// parse it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Argument {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            type_name: type_name.into(),
        }
    }

    pub(crate) fn teardown(self) -> Released {
        drop(self.name);
        drop(self.value);
        drop(self.type_name);
        Released {
            arguments: 1,
            text_buffers: 3,
        }
    }
}

impl<N, V, T> From<(N, V, T)> for Argument
where
    N: Into<String>,
    V: Into<String>,
    T: Into<String>,
{
    fn from((name, value, type_name): (N, V, T)) -> Self {
        Argument::new(name, value, type_name)
    }
}

/// Request to execute `procedure` with `arguments` bound positionally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    header: MessageHeader,
    procedure: Procedure,
    arguments: Vec<Argument>,
}

impl CallRequest {
    /// Build a request; argument order is kept exactly as given
    pub fn new(procedure: Procedure, arguments: Vec<Argument>) -> Self {
        Self {
            header: MessageHeader::new(MessageKind::CallRequest),
            procedure,
            arguments,
        }
    }

    /// Build a request from `(name, value, type)` triples
    pub fn from_triples<I, A>(procedure: Procedure, triples: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Argument>,
    {
        Self::new(procedure, triples.into_iter().map(Into::into).collect())
    }

    /// Append one argument after the existing ones
    pub fn with_argument(mut self, argument: impl Into<Argument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    pub fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Number of arguments; the value written as `argument_count` on the wire
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Hand the owned tree to the execution engine
    pub fn into_parts(self) -> (MessageHeader, Procedure, Vec<Argument>) {
        (self.header, self.procedure, self.arguments)
    }

    /// Encode into a new buffer
    pub fn encode(&self, limits: &Limits) -> MessageResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out, limits)?;
        Ok(out)
    }

    /// Append the encoding to `out`; on error `out` is left as it was
    pub fn encode_into(&self, out: &mut Vec<u8>, limits: &Limits) -> MessageResult<()> {
        let start = out.len();
        if let Err(err) = codec::encode_call_request(self, out, limits) {
            out.truncate(start);
            return Err(err);
        }
        debug!(
            procedure = %self.procedure.name,
            arguments = self.arguments.len(),
            bytes = out.len() - start,
            "encoded call request"
        );
        Ok(())
    }

    /// Exact number of bytes `encode` produces
    pub fn encoded_len(&self) -> usize {
        let text = |s: &str| 4 + s.len();
        MessageHeader::ENCODED_LEN
            + text(&self.procedure.source)
            + text(&self.procedure.name)
            + 4
            + self
                .arguments
                .iter()
                .map(|a| text(&a.name) + text(&a.value) + text(&a.type_name))
                .sum::<usize>()
    }

    /// Encode and write with a single channel write.
    ///
    /// The request is only borrowed, so after a `TransportWrite` failure it
    /// can be resent or torn down by the caller. Returns the bytes written.
    pub fn send<C: Channel + ?Sized>(
        &self,
        channel: &mut C,
        limits: &Limits,
    ) -> MessageResult<usize> {
        let bytes = self.encode(limits)?;
        channel.write(&bytes).map_err(MessageError::TransportWrite)?;
        Ok(bytes.len())
    }

    /// Decode a buffer holding exactly one call request
    pub fn decode(bytes: &[u8], limits: &Limits) -> MessageResult<Self> {
        let (request, consumed) = Self::decode_prefix(bytes, limits)?;
        if consumed != bytes.len() {
            let trailing = bytes.len() - consumed;
            let released = request.teardown();
            debug!(trailing, ?released, "discarded call request followed by trailing bytes");
            return Err(MessageError::TrailingBytes(trailing));
        }
        Ok(request)
    }

    /// Decode one call request from the front of `bytes`.
    ///
    /// Returns the request and the number of bytes it occupied.
    pub fn decode_prefix(bytes: &[u8], limits: &Limits) -> MessageResult<(Self, usize)> {
        let mut src = SliceSource::new(bytes);
        let request = codec::decode_call_request(&mut src, limits)?;
        Ok((request, src.position()))
    }

    /// Read one call request from a channel
    pub fn receive<C: Channel + ?Sized>(channel: &mut C, limits: &Limits) -> MessageResult<Self> {
        let mut src = ChannelSource::new(channel);
        codec::decode_call_request(&mut src, limits)
    }

    /// Release the whole tree and report what was released.
    ///
    /// Consumes the request, so a second teardown does not compile.
    pub fn teardown(self) -> Released {
        let mut released = Released::default();
        for argument in self.arguments {
            released += argument.teardown();
        }
        released += self.procedure.teardown();
        released
    }
}
