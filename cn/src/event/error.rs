//! Classification error types

use thiserror::Error;

use crate::protocol::ProtocolError;

/// Errors decoding the payload of an event kind the classifier must parse.
///
/// Treated with the same severity as [`ProtocolError`]: a structurally
/// wrong payload on the parent's own event channel means the two sides
/// disagree about the protocol, so the run loop terminates rather than
/// guessing.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("malformed payload: {0}")]
    Payload(#[from] ProtocolError),

    #[error("payload missing required field {name:?}")]
    MissingField { name: &'static str },

    #[error("field {name:?} is not an integer: {value:?}")]
    BadInteger { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_missing_field() {
        let err = ClassifyError::MissingField { name: "expected" };
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn test_protocol_errors_convert() {
        let err: ClassifyError = ProtocolError::MalformedToken {
            token: "junk".to_string(),
        }
        .into();
        assert!(matches!(err, ClassifyError::Payload(_)));
    }
}
