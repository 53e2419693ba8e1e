pub mod generate_report;

pub use generate_report::{GenerateSecurityReportUseCase, LlmReportGenerator};
