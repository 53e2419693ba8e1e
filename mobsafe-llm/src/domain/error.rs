//! Failures of a single Gemini `generateContent` call

use std::time::Duration;

/// Provider-level error, one variant per way the Gemini API can fail a
/// report request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// 401/403: missing, invalid or revoked API key
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 429, with the `Retry-After` header when Google sends one
    #[error("Rate limited: {message}")]
    RateLimited {
        retry_after_secs: Option<u64>,
        message: String,
    },

    /// 400/404: the request, schema or model name was refused
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Prompt or candidate stopped by Gemini safety settings
    #[error("Blocked by safety filter: {reason}")]
    Blocked { reason: String },

    #[error("Network error: {0}")]
    Network(String),

    /// `seconds` is 0 when the transport did not say
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// 5xx from the API
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Body was not a `generateContent` response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Whether the same request could succeed later without any change on
    /// our side. Reports are never retried; this only feeds logs.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::Network(_)
                | LlmError::Timeout { .. }
                | LlmError::Unavailable(_)
        )
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited {
                retry_after_secs, ..
            } => retry_after_secs.map(Duration::from_secs),
            _ => None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            retry_after_secs,
            message: message.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::timeout(0)
        } else if err.is_decode() {
            LlmError::InvalidResponse(format!("Undecodable body: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::InvalidResponse(format!("Not a generateContent body: {}", err))
    }
}
