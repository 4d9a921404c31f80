//! Call request wire codec
//!
//! ```text
//! [ header: kind tag u8 ]
//! [ proc.source: len:u32 + bytes ]
//! [ proc.name:   len:u32 + bytes ]
//! [ argument_count: i32 ]
//! repeated argument_count times:
//!   [ arg.name:  len:u32 + bytes ]
//!   [ arg.value: len:u32 + bytes ]
//!   [ arg.type:  len:u32 + bytes ]
//! ```

use crate::callreq::CallRequest;
use crate::error::{MessageError, MessageResult};
use crate::header::{MessageHeader, MessageKind};
use crate::limits::Limits;
use crate::partial::{PartialArgument, PartialCallRequest};
use crate::wire::{read_i32, read_text, write_i32, write_text, ByteSource};
use tracing::debug;

/// Smallest encoded argument: three empty length-prefixed fields
const MIN_ARGUMENT_BYTES: usize = 12;

/// Upfront argument slots when the source cannot say how much is left
const UNSIZED_RESERVATION: usize = 64;

pub(crate) fn encode_call_request(
    request: &CallRequest,
    out: &mut Vec<u8>,
    limits: &Limits,
) -> MessageResult<()> {
    let count = limits.check_outgoing(request.argument_count())?;

    request.header().encode(out);
    let procedure = request.procedure();
    write_text(out, "procedure.source", &procedure.source, limits)?;
    write_text(out, "procedure.name", &procedure.name, limits)?;
    write_i32(out, count);
    for argument in request.arguments() {
        write_text(out, "argument.name", &argument.name, limits)?;
        write_text(out, "argument.value", &argument.value, limits)?;
        write_text(out, "argument.type", &argument.type_name, limits)?;
    }
    Ok(())
}

/// Decode into a partial tree, releasing it if anything goes wrong
pub(crate) fn decode_call_request<S: ByteSource>(
    src: &mut S,
    limits: &Limits,
) -> MessageResult<CallRequest> {
    let mut partial = PartialCallRequest::default();
    if let Err(err) = fill(src, limits, &mut partial) {
        let released = partial.release();
        debug!(error = %err, ?released, "released partially decoded call request");
        return Err(err);
    }

    // `fill` only succeeds once every field has been read
    let request = partial.assemble();
    debug!(
        procedure = %request.procedure().name,
        arguments = request.argument_count(),
        "decoded call request"
    );
    Ok(request)
}

fn fill<S: ByteSource>(
    src: &mut S,
    limits: &Limits,
    partial: &mut PartialCallRequest,
) -> MessageResult<()> {
    let header = MessageHeader::decode(src)?;
    header.expect(MessageKind::CallRequest)?;
    partial.header = Some(header);

    partial.source = Some(read_text(src, "procedure.source", limits)?);
    partial.name = Some(read_text(src, "procedure.name", limits)?);

    // The count is validated before it sizes anything
    let count = limits.check_count(read_i32(src, "argument_count")?)?;
    let reserve = argument_reservation(count, src.remaining_hint());
    partial
        .arguments
        .try_reserve_exact(reserve)
        .map_err(|_| argument_allocation(reserve))?;
    partial.declared_count = Some(count);

    for index in 0..count {
        partial
            .arguments
            .try_reserve(1)
            .map_err(|_| argument_allocation(index + 1))?;
        partial.arguments.push(PartialArgument::default());
        let argument = &mut partial.arguments[index];
        argument.name = Some(read_text(src, "argument.name", limits)?);
        argument.value = Some(read_text(src, "argument.value", limits)?);
        argument.type_name = Some(read_text(src, "argument.type", limits)?);
    }
    Ok(())
}

/// Argument slots worth reserving before any argument bytes are seen
fn argument_reservation(count: usize, remaining: Option<usize>) -> usize {
    match remaining {
        Some(remaining) => count.min(remaining / MIN_ARGUMENT_BYTES),
        None => count.min(UNSIZED_RESERVATION),
    }
}

fn argument_allocation(slots: usize) -> MessageError {
    MessageError::allocation(
        "arguments",
        slots.saturating_mul(std::mem::size_of::<PartialArgument>()),
    )
}
