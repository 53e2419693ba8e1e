//! MobSafe LLM - report generation through a hosted language model
//!
//! The scan orchestrator depends only on [`ReportGenerator`]. This crate
//! provides the LLM-backed implementation:
//!
//! ```text
//! GenerateSecurityReportUseCase ──► LlmProvider (GoogleAIProvider)
//!            │                               │
//!            └── ResponseParser ◄── JSON text ┘
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::{GenerateSecurityReportUseCase, LlmReportGenerator};
pub use domain::*;
pub use infrastructure::prompts;
pub use infrastructure::providers::GoogleAIProvider;
