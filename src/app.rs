//! Application setup and wiring

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mobsafe_core::Config;
use mobsafe_core::domain::SecurityReport;
use mobsafe_llm::{
    GenerateSecurityReportUseCase, GenerationError, GoogleAIProvider, LlmError, ReportGenerator,
};
use mobsafe_orchestrator::{AlertFeed, SessionController};

/// Handle returned from create_app for shutdown coordination
pub struct AppHandle {
    pub config: Config,
    pub session: SessionController,
    pub alerts: Option<AlertFeed>,
    pub shutdown_token: CancellationToken,
}

impl AppHandle {
    /// Cancel every scan, remediation and alert owned by the application.
    pub fn shutdown(&self) {
        info!("Shutting down");
        self.shutdown_token.cancel();
    }
}

/// Stands in for the LLM generator when no API key is configured, so scans
/// still finish through the fallback policy.
struct UnconfiguredGenerator {
    reason: String,
}

#[async_trait]
impl ReportGenerator for UnconfiguredGenerator {
    async fn generate(&self, _device: &str) -> Result<SecurityReport, GenerationError> {
        Err(GenerationError::upstream(self.reason.clone()))
    }
}

/// Build the report generator described by `config.llm`.
pub fn build_generator(config: &Config) -> Result<Arc<dyn ReportGenerator>, LlmError> {
    match GoogleAIProvider::from_config(&config.llm) {
        Ok(provider) => {
            info!(model = %config.llm.default_model, "Using Google AI report generator");
            Ok(Arc::new(GenerateSecurityReportUseCase::new(
                Arc::new(provider),
                config.llm.clone(),
            )))
        }
        Err(LlmError::Configuration(reason)) => {
            warn!(%reason, "Report generator not configured; scans will use the fallback policy");
            Ok(Arc::new(UnconfiguredGenerator { reason }))
        }
        Err(e) => Err(e),
    }
}

/// Wire the application from configuration.
pub fn create_app(config: Config) -> Result<AppHandle, LlmError> {
    let generator = build_generator(&config)?;
    Ok(create_app_with_generator(config, generator))
}

/// Wire the application around an existing report generator.
pub fn create_app_with_generator(
    config: Config,
    generator: Arc<dyn ReportGenerator>,
) -> AppHandle {
    let shutdown_token = CancellationToken::new();

    let session = SessionController::new(
        generator,
        config.scan.clone(),
        config.remediation.clone(),
        shutdown_token.clone(),
    );

    let alerts = config
        .alerts
        .enabled
        .then(|| AlertFeed::spawn(config.alerts.initial_delay(), &shutdown_token));

    AppHandle {
        config,
        session,
        alerts,
        shutdown_token,
    }
}
