//! Report generator contract
//!
//! The orchestrator only sees this trait; whether reports come from an LLM, a
//! fixture or a real scan engine is an infrastructure concern.

use async_trait::async_trait;
use mobsafe_core::domain::SecurityReport;

use crate::domain::error::LlmError;

/// Why a report could not be produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Report generation timed out")]
    Timeout,

    /// The API answered with an error. `retryable` marks outages and rate
    /// limits as opposed to bad keys or refused requests.
    #[error("Upstream error: {message}")]
    Upstream { message: String, retryable: bool },

    #[error("Empty response from report generator")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Report does not match schema: {0}")]
    Schema(String),
}

impl GenerationError {
    /// A non-transient upstream failure
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            retryable: false,
        }
    }

    /// Whether a later scan could plausibly get a report
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Upstream { retryable, .. } => *retryable,
            Self::EmptyResponse | Self::MalformedResponse(_) | Self::Schema(_) => false,
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Network(msg) => GenerationError::Network(msg),
            LlmError::Timeout { .. } => GenerationError::Timeout,
            LlmError::InvalidResponse(msg) => GenerationError::MalformedResponse(msg),
            other => GenerationError::Upstream {
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }
}

/// Produces a security report for a device descriptor
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, device: &str) -> Result<SecurityReport, GenerationError>;
}
