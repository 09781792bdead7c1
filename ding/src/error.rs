//! Robot delivery error types

use thiserror::Error;

/// Errors that can occur delivering a message to the robot webhook.
#[derive(Debug, Error)]
pub enum RobotError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response (HTTP {status}): {body}")]
    MalformedResponse { status: u16, body: String },

    #[error("robot rejected message (errcode {code}): {message}")]
    Application { code: i64, message: String },

    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl RobotError {
    /// Check if a later identical send could plausibly succeed.
    ///
    /// Application rejections and validation failures are deterministic;
    /// only transport-level failures are worth a retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, RobotError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_is_not_transient() {
        let err = RobotError::Application {
            code: 310000,
            message: "keywords not in content".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_malformed_response_is_not_transient() {
        let err = RobotError::MalformedResponse {
            status: 502,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_invalid_message_is_not_transient() {
        let err = RobotError::InvalidMessage("text content must not be empty".to_string());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_display_includes_errcode() {
        let err = RobotError::Application {
            code: 130101,
            message: "send too fast".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("130101"));
        assert!(text.contains("send too fast"));
    }
}
