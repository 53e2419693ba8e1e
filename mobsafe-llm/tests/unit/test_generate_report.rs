//! Unit tests for GenerateSecurityReportUseCase

mod common {
    include!("../common/mod.rs");
}

use common::{MockLlmProvider, create_test_config, high_risk_report_json};
use mobsafe_core::domain::{ReportOrigin, Severity, ThreatLevel};
use mobsafe_llm::domain::{GenerationError, LlmError, ReportGenerator, Role};
use mobsafe_llm::GenerateSecurityReportUseCase;
use rstest::rstest;
use std::sync::Arc;

fn use_case(provider: MockLlmProvider) -> GenerateSecurityReportUseCase {
    GenerateSecurityReportUseCase::new(Arc::new(provider), create_test_config())
}

#[tokio::test]
async fn test_generate_report_success() {
    let provider = MockLlmProvider::with_json_response(high_risk_report_json());
    let report = use_case(provider).execute("Android 14 Pixel 8").await.unwrap();

    assert_eq!(report.overall_status, ThreatLevel::High);
    assert_eq!(report.scanned_files_count, 1000);
    assert_eq!(report.threats_detected, 2);
    assert_eq!(report.vulnerabilities.len(), 2);
    assert_eq!(report.vulnerabilities[0].id, "vuln-1");
    assert_eq!(report.vulnerabilities[1].severity, Severity::Medium);
    assert_eq!(report.origin, ReportOrigin::Generated);
}

#[tokio::test]
async fn test_generate_report_request_shape() {
    let provider = MockLlmProvider::with_json_response(high_risk_report_json());
    let captured = provider.captured_requests.clone();

    use_case(provider).execute("iPhone 15 Pro").await.unwrap();

    let requests = captured.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert_eq!(request.model.as_deref(), Some("test-model"));
    assert_eq!(request.max_tokens, Some(4096));
    assert_eq!(request.temperature, Some(0.7));

    let format = request.response_format.as_ref().expect("response format");
    assert_eq!(format.mime_type, "application/json");
    let schema = format.schema.as_ref().expect("schema");
    assert_eq!(schema["properties"]["overallStatus"]["type"], "STRING");

    assert_eq!(request.messages[0].role, Role::System);
    let user = request
        .messages
        .iter()
        .find(|m| m.role == Role::User)
        .expect("user message");
    assert!(user.content.contains("iPhone 15 Pro"));
}

#[tokio::test]
async fn test_generate_report_from_fenced_json() {
    let content = format!("Here is the report:\n```json\n{}\n```", high_risk_report_json());
    let provider = MockLlmProvider::with_json_response(&content);

    let report = use_case(provider).execute("Pixel 8").await.unwrap();
    assert_eq!(report.vulnerabilities.len(), 2);
}

#[tokio::test]
async fn test_generate_report_reconciles_threat_count() {
    let content = high_risk_report_json().replace("\"threatsDetected\": 2", "\"threatsDetected\": 7");
    let provider = MockLlmProvider::with_json_response(&content);

    let report = use_case(provider).execute("Pixel 8").await.unwrap();
    assert_eq!(report.threats_detected, 2);
}

#[tokio::test]
async fn test_generate_report_safe_device() {
    let content = r#"{
        "overallStatus": "SAFE",
        "scanDate": "2025-06-01T12:00:00.000Z",
        "scannedFilesCount": 9000,
        "threatsDetected": 0,
        "summary": "All clear.",
        "vulnerabilities": []
    }"#;
    let provider = MockLlmProvider::with_json_response(content);

    let report = use_case(provider).execute("Pixel 8").await.unwrap();
    assert_eq!(report.overall_status, ThreatLevel::Safe);
    assert!(report.vulnerabilities.is_empty());
    assert!(!report.requires_action());
}

#[rstest]
#[case::blank("   ")]
#[case::empty("")]
#[tokio::test]
async fn test_generate_report_empty_response(#[case] content: &str) {
    let provider = MockLlmProvider::with_json_response(content);
    let err = use_case(provider).execute("Pixel 8").await.unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);
}

#[tokio::test]
async fn test_generate_report_malformed_response() {
    let provider = MockLlmProvider::with_json_response("I cannot produce a report right now.");
    let err = use_case(provider).execute("Pixel 8").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[rstest]
#[case::unknown_status(r#""overallStatus": "HIGH""#, r#""overallStatus": "DANGEROUS""#)]
#[case::safe_finding(r#""severity": "HIGH""#, r#""severity": "SAFE""#)]
#[case::negative_count(r#""scannedFilesCount": 1000"#, r#""scannedFilesCount": -1"#)]
#[case::missing_summary(r#""summary": "Two issues need attention.","#, "")]
#[case::free_text_scan_date(r#""scanDate": "2025-06-01T12:00:00.000Z""#, r#""scanDate": "yesterday""#)]
#[case::date_without_time(r#""scanDate": "2025-06-01T12:00:00.000Z""#, r#""scanDate": "2025-06-01""#)]
#[case::duplicate_vulnerability_id(r#""id": "vuln-2""#, r#""id": "vuln-1""#)]
#[tokio::test]
async fn test_generate_report_schema_violation(#[case] from: &str, #[case] to: &str) {
    let content = high_risk_report_json().replacen(from, to, 1);
    let provider = MockLlmProvider::with_json_response(&content);

    let err = use_case(provider).execute("Pixel 8").await.unwrap_err();
    assert!(matches!(err, GenerationError::Schema(_)), "got {err:?}");
}

#[rstest]
#[case::timeout(LlmError::timeout(30), GenerationError::Timeout)]
#[case::network(
    LlmError::network("connection reset"),
    GenerationError::Network("connection reset".to_string())
)]
#[case::auth(
    LlmError::auth("bad key"),
    GenerationError::upstream("Authentication failed: bad key")
)]
#[case::unavailable(
    LlmError::Unavailable("overloaded".into()),
    GenerationError::Upstream {
        message: "Service unavailable: overloaded".to_string(),
        retryable: true,
    }
)]
#[tokio::test]
async fn test_generate_report_provider_errors(
    #[case] error: LlmError,
    #[case] expected: GenerationError,
) {
    let provider = MockLlmProvider::new().with_error(error);
    let err = use_case(provider).execute("Pixel 8").await.unwrap_err();
    assert_eq!(err, expected);
}

#[tokio::test]
async fn test_use_case_as_report_generator() {
    let provider = MockLlmProvider::with_json_response(high_risk_report_json());
    let generator: Arc<dyn ReportGenerator> = Arc::new(use_case(provider));

    let report = generator.generate("Pixel 8").await.unwrap();
    assert_eq!(report.threats_detected, 2);
}
