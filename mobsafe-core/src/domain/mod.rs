//! Domain models shared across the workspace

pub mod report;
pub mod user;

pub use report::{
    FALLBACK_SCANNED_FILES, FALLBACK_SUMMARY, ReportOrigin, ReportValidationError,
    SecurityReport, Severity, SeverityCounts, ThreatLevel, Vulnerability,
};
pub use user::{User, UserRole};
