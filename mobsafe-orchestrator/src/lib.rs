//! MobSafe Orchestrator - scan lifecycle, report view-state and session control
//!
//! # Architecture
//!
//! ```text
//! mobsafe-orchestrator/
//! ├── domain/           # ScanStatus state machine, ScanState, errors
//! ├── application/
//! │   ├── orchestrator.rs  # ScanOrchestrator / ScanHandle
//! │   ├── report_view.rs   # ReportView ("fix all" remediation)
//! │   └── session.rs       # SessionController
//! └── infrastructure/
//!     └── alerts.rs        # AlertFeed
//! ```
//!
//! Every timer-driven task is gated by a `CancellationToken`. Tokens form a
//! tree rooted at the application shutdown token, so signing out or shutting
//! down tears down every scan, remediation and alert below it.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    FIXED_SUMMARY, ReportView, ScanHandle, ScanOrchestrator, SessionController, SessionSnapshot,
    fallback_report,
};
pub use domain::*;
pub use infrastructure::{AlertFeed, AlertSeverity, SecurityAlert};
