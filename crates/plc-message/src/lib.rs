//! PL/Container call-request message
//!
//! This library provides the message a host sends to a container to run a
//! procedure:
//! - The owned message tree (`CallRequest`, `Procedure`, `Argument`)
//! - Length-prefixed wire encoding and bounded decoding
//! - Teardown with release accounting (`free_callreq`)
//! - The `Channel` seam plus in-memory and `std::io` adapters
//!
//! # Example
//!
//! ```
//! use plc_message::{Argument, CallRequest, Limits, MemoryChannel, Procedure};
//!
//! let limits = Limits::default();
//! let request = CallRequest::new(
//!     Procedure::new("return 1", "f"),
//!     vec![Argument::new("x", "42", "int")],
//! );
//!
//! let mut channel = MemoryChannel::new();
//! request.send(&mut channel, &limits).unwrap();
//!
//! let received = CallRequest::receive(&mut channel, &limits).unwrap();
//! assert_eq!(received, request);
//! ```

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod callreq;
mod codec;
pub mod error;
pub mod header;
pub mod limits;
pub mod partial;
pub mod teardown;
pub mod transport;
mod wire;

pub use callreq::{Argument, CallRequest, Procedure};
pub use error::{MessageError, MessageResult, TransportError};
pub use header::{MessageHeader, MessageKind};
pub use limits::Limits;
pub use partial::{PartialArgument, PartialCallRequest};
pub use teardown::{free_callreq, Released};
pub use transport::{Channel, IoChannel, MemoryChannel};
