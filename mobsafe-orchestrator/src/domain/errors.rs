//! Orchestrator error types

use crate::domain::value_objects::ScanTransitionError;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan already started on this orchestrator")]
    AlreadyStarted,

    #[error(transparent)]
    InvalidTransition(#[from] ScanTransitionError),
}

/// Why a remediation request was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RemediationError {
    #[error("No report to remediate")]
    NoReport,

    #[error("Report has no issues to fix")]
    NothingToFix,

    #[error("All issues are already fixed")]
    AlreadyFixed,

    #[error("Remediation already in progress")]
    InProgress,

    #[error("Fix all was not requested")]
    NotRequested,

    #[error("Report view is closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Guest accounts cannot sign in")]
    GuestNotAllowed,

    #[error(transparent)]
    Scan(#[from] ScanError),
}
