//! Protocol error types

use thiserror::Error;

/// Errors that break the framing of the inbound event stream.
///
/// All variants are fatal: once a header line or payload boundary is
/// wrong, the stream position is unrecoverable, so the listener terminates
/// instead of attempting to resynchronize.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed token {token:?}: expected key:value")]
    MalformedToken { token: String },

    #[error("header line not terminated before stream closed")]
    UnterminatedHeader,

    #[error("bad payload length {value:?}")]
    BadLength { value: String },

    #[error("payload truncated: expected {expected} bytes")]
    TruncatedPayload { expected: usize },

    #[error("I/O error on event stream: {0}")]
    Io(#[from] std::io::Error),
}
