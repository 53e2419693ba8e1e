//! Orchestrator value objects

use serde::{Deserialize, Serialize};

/// Files shown as "currently scanning" while the simulated scan runs
pub const SCANNED_FILES: &[&str] = &[
    "com.android.systemui",
    "kernel_task",
    "network_stack",
    "user_data_0",
    "crypt_key_store",
    "camera_permissions",
    "downloads/unknown.apk",
    "temp/cache_v2.db",
];

/// File label shown before the first stage tick
pub const INITIAL_FILE: &str = "System Boot";

/// Scan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    /// Orchestrator created, scan not started
    Idle,
    /// Simulated scan or report request in flight
    Running,
    /// Report available
    Complete,
    /// Generation failed and the failure is surfaced
    Error,
}

impl ScanStatus {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// Idle ──► Running ──► Complete
    ///            │
    ///            └──────► Error
    /// ```
    pub fn valid_transitions(&self) -> &[ScanStatus] {
        match self {
            Self::Idle => &[Self::Running],
            Self::Running => &[Self::Complete, Self::Error],
            Self::Complete | Self::Error => &[],
        }
    }

    pub fn can_transition_to(&self, target: &ScanStatus) -> bool {
        self.valid_transitions().contains(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Complete => write!(f, "Complete"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Recorded status transition of a scan run (audit trail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanTransition {
    pub from: ScanStatus,
    pub to: ScanStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error returned when an invalid status transition is attempted.
#[derive(Debug, thiserror::Error)]
#[error("Invalid scan transition from {from} to {to}")]
pub struct ScanTransitionError {
    pub from: ScanStatus,
    pub to: ScanStatus,
}

/// Stage label shown alongside the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStage {
    Initializing,
    MappingFileSystem,
    HeuristicAnalysis,
    CheckingPermissions,
    AiThreatDetection,
    Finalizing,
    Complete,
}

impl ScanStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing Liquid Engine...",
            Self::MappingFileSystem => "Mapping File System...",
            Self::HeuristicAnalysis => "Heuristic Analysis...",
            Self::CheckingPermissions => "Checking Permissions...",
            Self::AiThreatDetection => "AI Threat Detection...",
            Self::Finalizing => "Finalizing Report...",
            Self::Complete => "Scan Complete",
        }
    }

    /// Stage for a progress value while the simulated scan is running.
    ///
    /// From 90 onwards the current stage is kept, so `None` is returned.
    pub fn for_progress(progress: f64) -> Option<Self> {
        if progress < 20.0 {
            Some(Self::MappingFileSystem)
        } else if progress < 45.0 {
            Some(Self::HeuristicAnalysis)
        } else if progress < 70.0 {
            Some(Self::CheckingPermissions)
        } else if progress < 90.0 {
            Some(Self::AiThreatDetection)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Safety verdict of the report view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    NoReport,
    Safe,
    AtRisk,
}

/// Where the "fix all" flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemediationPhase {
    Idle,
    AwaitingConfirmation,
    Fixing,
    Fixed,
}
