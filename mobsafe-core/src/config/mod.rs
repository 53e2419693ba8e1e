//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub scan: ScanConfig,
    pub remediation: RemediationConfig,
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// One of "json", "pretty", "compact"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM configuration used by the report generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Active provider. Only "google_ai" is supported.
    pub provider: String,

    /// Google AI (Gemini) configuration
    pub google_ai: GoogleAIConfig,

    /// Model used to generate scan reports
    pub default_model: String,
    /// Temperature for generation (0.0 to 2.0)
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "google_ai".to_string(),
            google_ai: GoogleAIConfig::default(),
            default_model: "gemini-2.5-flash".to_string(),
            temperature: 1.0,
            max_tokens: 2048,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Google AI (Gemini) provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleAIConfig {
    /// API Key (can also use GOOGLE_AI_KEY or API_KEY env vars)
    pub api_key: Option<String>,
    /// Base URL for the API
    pub base_url: String,
}

impl Default for GoogleAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// What the orchestrator does when report generation fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Complete the scan with a synthetic "safe" report
    #[default]
    SyntheticSafe,
    /// Finish the scan in the error state without a report
    Surface,
}

/// Simulated scan timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Device descriptor used when none is given
    pub default_device: String,
    /// Minimum time the scan animation runs before the report is requested
    pub duration_ms: u64,
    /// Interval between progress increments
    pub progress_tick_ms: u64,
    /// Progress added on every tick
    pub progress_step: f64,
    /// Progress is held at this value until the report arrives
    pub progress_hold: f64,
    /// Interval between stage label refreshes
    pub stage_tick_ms: u64,
    /// Pause between "Scan Complete" and handing the report over
    pub settle_ms: u64,
    pub fallback: FallbackPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_device: "Android 14 Pixel 8".to_string(),
            duration_ms: 6000,
            progress_tick_ms: 40,
            progress_step: 0.5,
            progress_hold: 92.0,
            stage_tick_ms: 200,
            settle_ms: 800,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl ScanConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn stage_tick(&self) -> Duration {
        Duration::from_millis(self.stage_tick_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// Simulated time needed to remediate all findings
    pub delay_ms: u64,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self { delay_ms: 2500 }
    }
}

impl RemediationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Background alert feed shown on the user dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub enabled: bool,
    pub initial_delay_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 4000,
        }
    }
}

impl AlertConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.llm.validate()?;
        self.scan.validate()?;
        self.remediation.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MOBSAFE").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;

        // Conventional key variables used by the Gemini tooling
        if config.llm.google_ai.api_key.is_none() {
            config.llm.google_ai.api_key = std::env::var("GOOGLE_AI_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
