//! Seam between the report use case and a concrete model API

use async_trait::async_trait;

use crate::domain::error::LlmError;
use crate::domain::messages::{CompletionRequest, CompletionResponse};

/// A model endpoint that turns one request into one completion.
///
/// Used as `Arc<dyn LlmProvider>` so tests can swap in a scripted provider.
///
/// ```rust,ignore
/// let request = CompletionRequest::new().with_user("Scan Pixel 8");
/// let report_json = provider.complete(request).await?.text().to_string();
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Model used when the request leaves `model` unset
    fn default_model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
