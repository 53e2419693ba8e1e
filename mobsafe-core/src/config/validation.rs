//! Configuration validation module

use crate::config::{LlmConfig, LoggingConfig, RemediationConfig, ScanConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Logging configuration error: {message}")]
    Logging { message: String },

    #[error("LLM configuration error: {message}")]
    Llm { message: String },

    #[error("Scan configuration error: {message}")]
    Scan { message: String },

    #[error("Remediation configuration error: {message}")]
    Remediation { message: String },
}

impl ValidationError {
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    pub fn scan(message: impl Into<String>) -> Self {
        Self::Scan {
            message: message.into(),
        }
    }

    pub fn remediation(message: impl Into<String>) -> Self {
        Self::Remediation {
            message: message.into(),
        }
    }
}

const LOG_FORMATS: &[&str] = &["json", "pretty", "compact"];

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            return Err(ValidationError::logging("Log level cannot be empty"));
        }
        if !LOG_FORMATS.contains(&self.format.as_str()) {
            return Err(ValidationError::logging(format!(
                "Unknown log format '{}', expected one of {:?}",
                self.format, LOG_FORMATS
            )));
        }
        Ok(())
    }
}

impl Validate for LlmConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.provider != "google_ai" {
            return Err(ValidationError::llm(format!(
                "Unsupported provider '{}'",
                self.provider
            )));
        }
        if self.google_ai.base_url.trim().is_empty() {
            return Err(ValidationError::llm("Google AI base_url cannot be empty"));
        }
        if self.default_model.trim().is_empty() {
            return Err(ValidationError::llm("default_model cannot be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::llm("temperature must be between 0.0 and 2.0"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::llm("max_tokens must be > 0"));
        }
        if self.timeout_seconds == 0 {
            return Err(ValidationError::llm("timeout_seconds must be > 0"));
        }
        Ok(())
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.default_device.trim().is_empty() {
            return Err(ValidationError::scan("default_device cannot be empty"));
        }
        if self.progress_tick_ms == 0 || self.stage_tick_ms == 0 {
            return Err(ValidationError::scan("tick intervals must be > 0"));
        }
        if !(self.progress_step > 0.0) {
            return Err(ValidationError::scan("progress_step must be > 0"));
        }
        if !(self.progress_hold > 0.0 && self.progress_hold <= 100.0) {
            return Err(ValidationError::scan(
                "progress_hold must be within (0, 100]",
            ));
        }
        Ok(())
    }
}

impl Validate for RemediationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 10 minutes is far beyond any simulated remediation
        if self.delay_ms > 600_000 {
            return Err(ValidationError::remediation("delay_ms must be <= 600000"));
        }
        Ok(())
    }
}
