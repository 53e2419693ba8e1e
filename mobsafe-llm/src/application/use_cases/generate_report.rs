use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use mobsafe_core::config::LlmConfig;
use mobsafe_core::domain::SecurityReport;

use crate::domain::{
    CompletionRequest, GenerationError, LlmProvider, ReportGenerator, ResponseFormat,
};
use crate::infrastructure::prompts::{PromptBuilder, SCAN_SYSTEM_PROMPT};
use crate::infrastructure::response_parser::ResponseParser;

/// Generates a [`SecurityReport`] for a device by asking an LLM for JSON that
/// follows the report schema.
pub struct GenerateSecurityReportUseCase {
    provider: Arc<dyn LlmProvider>,
    config: LlmConfig,
}

impl GenerateSecurityReportUseCase {
    pub fn new(provider: Arc<dyn LlmProvider>, config: LlmConfig) -> Self {
        Self { provider, config }
    }

    pub async fn execute(&self, device: &str) -> Result<SecurityReport, GenerationError> {
        let scan_date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let request = CompletionRequest::new()
            .with_model(&self.config.default_model)
            .with_system(SCAN_SYSTEM_PROMPT)
            .with_user(PromptBuilder::build_scan_prompt(device, &scan_date))
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_response_format(ResponseFormat::json_schema(
                PromptBuilder::security_report_schema(),
            ));

        debug!(device, model = %self.config.default_model, "Requesting security report");

        let response = self.provider.complete(request).await.map_err(|err| {
            warn!(
                device,
                error = %err,
                retryable = err.is_retryable(),
                retry_after = ?err.retry_after(),
                "Report request failed"
            );
            GenerationError::from(err)
        })?;

        if response.text().trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        if response.is_truncated() {
            warn!(device, "Report response hit the token limit");
        }

        let value: serde_json::Value = ResponseParser::parse_json(response.text())
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let mut report: SecurityReport =
            serde_json::from_value(value).map_err(|e| GenerationError::Schema(e.to_string()))?;
        report
            .validate()
            .map_err(|e| GenerationError::Schema(e.to_string()))?;

        if let Some(reported) = report.reconcile_threat_count() {
            warn!(
                device,
                reported,
                enumerated = report.threats_detected,
                "threatsDetected disagreed with the vulnerability list; using the list length"
            );
        }

        info!(
            device,
            status = %report.overall_status,
            threats = report.threats_detected,
            "Security report generated"
        );

        Ok(report)
    }
}

#[async_trait]
impl ReportGenerator for GenerateSecurityReportUseCase {
    async fn generate(&self, device: &str) -> Result<SecurityReport, GenerationError> {
        self.execute(device).await
    }
}

/// The LLM-backed [`ReportGenerator`]
pub type LlmReportGenerator = GenerateSecurityReportUseCase;
