// Common test utilities and mock implementations.
// Included with `include!`, so no inner attributes here.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use mobsafe_core::config::LlmConfig;
use mobsafe_llm::domain::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, StopReason, Usage,
};

/// Mock LLM provider for testing
pub struct MockLlmProvider {
    /// Response to return from complete()
    pub response: Option<CompletionResponse>,
    /// Error to return (if any)
    pub error: Option<LlmError>,
    /// Captured requests for verification
    pub captured_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

#[allow(dead_code)]
impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            response: None,
            error: None,
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(mut self, response: CompletionResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_error(mut self, error: LlmError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_json_response(content: &str) -> Self {
        Self::new().with_response(create_completion_response(content))
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn default_model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.captured_requests.lock().await.push(request);

        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        self.response
            .clone()
            .ok_or_else(|| LlmError::InvalidResponse("No response configured".to_string()))
    }
}

/// Create a standard LLM response with given content
pub fn create_completion_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        id: "test-response-id".to_string(),
        model: "test-model".to_string(),
        content: content.to_string(),
        stop_reason: StopReason::EndTurn,
        usage: Usage {
            prompt_tokens: 100,
            completion_tokens: 50,
            total_tokens: 150,
        },
        created: Some(1234567890),
    }
}

/// Create default test LlmConfig
#[allow(dead_code)]
pub fn create_test_config() -> LlmConfig {
    let mut config = LlmConfig::default();
    config.google_ai.api_key = Some("test-api-key".to_string());
    config.google_ai.base_url = "https://test.api.example.com".to_string();
    config.default_model = "test-model".to_string();
    config.temperature = 0.7;
    config.max_tokens = 4096;
    config.timeout_seconds = 30;
    config
}

/// A schema-conforming report with two findings
#[allow(dead_code)]
pub fn high_risk_report_json() -> &'static str {
    r#"{
        "overallStatus": "HIGH",
        "scanDate": "2025-06-01T12:00:00.000Z",
        "scannedFilesCount": 1000,
        "threatsDetected": 2,
        "summary": "Two issues need attention.",
        "vulnerabilities": [
            {
                "id": "vuln-1",
                "name": "Outdated OS",
                "description": "The security patch level is six months old.",
                "severity": "HIGH",
                "remediation": "Install the latest system update."
            },
            {
                "id": "vuln-2",
                "name": "Suspicious APK Permissions",
                "description": "WeatherWidget.apk requests SMS access.",
                "severity": "MEDIUM",
                "remediation": "Revoke SMS permission or uninstall the app."
            }
        ]
    }"#
}
