//! Error taxonomy for the webhook relay
//!
//! - [`SignatureInvalid`]: the platform could not be authenticated (HTTP 400)
//! - [`CompletionError`]: text generation failed (absorbed, fallback reply)
//! - [`DeliveryError`]: the reply could not be delivered (HTTP 500)

use axum::http::StatusCode;

/// The webhook body could not be authenticated against the channel secret
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureInvalid {
    #[error("missing X-Line-Signature header")]
    Missing,

    #[error("signature header is not valid base64")]
    Malformed,

    #[error("signature does not match request body")]
    Mismatch,
}

/// Generative backend failure
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion transport error: {0}")]
    Transport(reqwest::Error),

    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("prompt blocked by backend: {0}")]
    Blocked(String),

    #[error("completion response contained no text")]
    Empty,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Reply could not be delivered to the messaging platform
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("reply request timed out")]
    Timeout,

    #[error("reply transport error: {0}")]
    Transport(reqwest::Error),

    #[error("reply API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Failure of one webhook delivery, as seen by the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Signature(#[from] SignatureInvalid),

    #[error("failed to parse webhook body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl PipelineError {
    /// Status code reported back to the platform
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Signature(_) => StatusCode::BAD_REQUEST,
            Self::Parse(_) | Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PipelineError::from(SignatureInvalid::Missing).status_code(),
            StatusCode::BAD_REQUEST
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            PipelineError::from(parse).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let delivery = DeliveryError::Api {
            status: 400,
            message: "Invalid reply token".to_string(),
        };
        assert_eq!(
            PipelineError::from(delivery).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CompletionError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "completion API error (403): API key not valid"
        );
        assert_eq!(
            SignatureInvalid::Mismatch.to_string(),
            "signature does not match request body"
        );
    }
}
