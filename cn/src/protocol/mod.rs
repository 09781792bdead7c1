//! Framed event-stream protocol.
//!
//! The parent process manager speaks a half-duplex, newline-framed
//! protocol with its event listeners: the listener announces `READY`, the
//! parent sends one header line plus an optional fixed-length payload
//! block, and the listener answers with a `RESULT` frame before the next
//! `READY`. The parent never sends a second frame until the prior one is
//! acknowledged.

mod error;
mod frame;
mod transport;

pub use error::ProtocolError;
pub use frame::{Frame, parse_fields, render_fields};
pub use transport::{EventStream, READY_TOKEN, RESULT_OK};
