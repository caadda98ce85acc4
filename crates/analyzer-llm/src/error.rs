//! Errors returned by completion providers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// Non-success status without a more specific mapping
    #[error("completion request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("completion endpoint rejected the API key")]
    AuthenticationFailed,

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Body parsed but did not carry a usable reply
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl LLMError {
    /// Map an HTTP error status from the completion endpoint
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            400 => LLMError::InvalidRequest(body),
            401 | 403 => LLMError::AuthenticationFailed,
            404 => LLMError::ModelNotFound(model.to_string()),
            429 => LLMError::RateLimitExceeded(body),
            _ => LLMError::RequestFailed { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            LLMError::from_status(401, String::new(), "m"),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            LLMError::from_status(404, String::new(), "llama3-70b-8192"),
            LLMError::ModelNotFound(m) if m == "llama3-70b-8192"
        ));
        assert!(matches!(
            LLMError::from_status(429, "slow down".to_string(), "m"),
            LLMError::RateLimitExceeded(_)
        ));
    }

    #[test]
    fn test_request_failed_display() {
        let err = LLMError::from_status(503, "overloaded".to_string(), "m");
        assert_eq!(
            err.to_string(),
            "completion request failed with HTTP 503: overloaded"
        );
    }
}
