pub mod error;
pub mod generator;
pub mod messages;
pub mod provider;

pub use error::LlmError;
pub use generator::{GenerationError, ReportGenerator};
pub use messages::{
    CompletionRequest, CompletionResponse, Message, ResponseFormat, Role, StopReason, Usage,
};
pub use provider::LlmProvider;
