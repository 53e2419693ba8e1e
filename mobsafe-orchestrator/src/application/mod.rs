//! Orchestrator application layer

pub mod orchestrator;
pub mod report_view;
pub mod session;

pub use orchestrator::{ScanHandle, ScanOrchestrator, fallback_report};
pub use report_view::{FIXED_SUMMARY, ReportView};
pub use session::{SessionController, SessionSnapshot};
