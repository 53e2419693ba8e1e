//! Integration tests for the Gemini provider against a mock HTTP server

use mobsafe_llm::domain::{CompletionRequest, LlmError, LlmProvider, ResponseFormat, StopReason};
use mobsafe_llm::prompts::PromptBuilder;
use mobsafe_llm::GoogleAIProvider;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/test-model:generateContent";

fn provider(server: &MockServer) -> GoogleAIProvider {
    GoogleAIProvider::new("test-key", "test-model")
        .unwrap()
        .with_base_url(server.uri())
}

fn report_request() -> CompletionRequest {
    CompletionRequest::new()
        .with_system("You are a scanner")
        .with_user("Scan a Pixel 8")
        .with_max_tokens(256)
        .with_response_format(ResponseFormat::json_schema(
            PromptBuilder::security_report_schema(),
        ))
}

fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 34,
            "totalTokenCount": 46
        }
    })
}

#[tokio::test]
async fn test_complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are a scanner" }] },
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(r#"{"ok":true}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).complete(report_request()).await.unwrap();

    assert_eq!(response.text(), r#"{"ok":true}"#);
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.total_tokens, 46);
    assert_eq!(response.model, "test-model");
}

#[tokio::test]
async fn test_complete_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "17")
                .set_body_string("quota exceeded"),
        )
        .mount(&server)
        .await;

    let err = provider(&server).complete(report_request()).await.unwrap_err();

    assert!(matches!(err, LlmError::RateLimited { .. }));
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(17)));
}

#[tokio::test]
async fn test_complete_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(report_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Unavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_complete_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(report_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Authentication(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_complete_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(report_request()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_complete_blocked_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = provider(&server).complete(report_request()).await.unwrap_err();
    match err {
        LlmError::Blocked { reason } => assert_eq!(reason, "SAFETY"),
        other => panic!("expected Blocked, got {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"overall" }] },
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .mount(&server)
        .await;

    let response = provider(&server).complete(report_request()).await.unwrap();
    assert!(response.is_truncated());
}
