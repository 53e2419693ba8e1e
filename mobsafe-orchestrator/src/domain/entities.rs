//! Orchestrator domain entities

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mobsafe_core::domain::SecurityReport;
use mobsafe_llm::domain::GenerationError;

use crate::domain::value_objects::{
    ScanStage, ScanStatus, ScanTransition, ScanTransitionError,
};

/// Observable state of one scan, published through a watch channel
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Idle,
    Running {
        /// Percentage in [0, 100], never decreasing within a run
        progress: f64,
        stage: ScanStage,
        current_file: &'static str,
    },
    Complete(Arc<SecurityReport>),
    Error(String),
}

impl ScanState {
    pub fn status(&self) -> ScanStatus {
        match self {
            Self::Idle => ScanStatus::Idle,
            Self::Running { .. } => ScanStatus::Running,
            Self::Complete(_) => ScanStatus::Complete,
            Self::Error(_) => ScanStatus::Error,
        }
    }

    pub fn progress(&self) -> f64 {
        match self {
            Self::Idle => 0.0,
            Self::Running { progress, .. } => *progress,
            Self::Complete(_) | Self::Error(_) => 100.0,
        }
    }

    pub fn report(&self) -> Option<&Arc<SecurityReport>> {
        match self {
            Self::Complete(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

/// Terminal notification delivered to the scan caller
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Completed(Arc<SecurityReport>),
    Failed(GenerationError),
}

/// One scan run with its audit trail
#[derive(Debug, Clone)]
pub struct ScanRun {
    pub id: Uuid,
    pub device: String,
    pub status: ScanStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub transitions: Vec<ScanTransition>,
    /// Set when the run was torn down before reaching a terminal state
    pub cancelled: bool,
}

impl ScanRun {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device: device.into(),
            status: ScanStatus::Idle,
            started_at: None,
            finished_at: None,
            error: None,
            transitions: Vec::new(),
            cancelled: false,
        }
    }

    /// Move to `to`, recording the transition in the audit trail.
    pub fn transition(
        &mut self,
        to: ScanStatus,
        reason: Option<String>,
    ) -> Result<(), ScanTransitionError> {
        if !self.status.can_transition_to(&to) {
            return Err(ScanTransitionError {
                from: self.status,
                to,
            });
        }

        let now = Utc::now();
        match to {
            ScanStatus::Running => self.started_at = Some(now),
            ScanStatus::Complete | ScanStatus::Error => self.finished_at = Some(now),
            ScanStatus::Idle => {}
        }

        self.transitions.push(ScanTransition {
            from: self.status,
            to,
            timestamp: now,
            reason,
        });
        self.status = to;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
