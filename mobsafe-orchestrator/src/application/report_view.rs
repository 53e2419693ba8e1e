//! Report consumption and the "fix all" remediation flow.
//!
//! The view never mutates the report. Remediation only flips the derived
//! `all_fixed` flag, which resets whenever a new report is presented.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use mobsafe_core::domain::{SecurityReport, Vulnerability};

use crate::domain::{RemediationError, RemediationPhase, Verdict};

/// Summary shown once every issue has been remediated
pub const FIXED_SUMMARY: &str = "All detected threats have been successfully neutralized. Your device security settings have been restored to optimal levels. No further action is required.";

#[derive(Debug, Default)]
struct ViewState {
    report: Option<Arc<SecurityReport>>,
    all_fixed: bool,
    phase: Phase,
    /// Bumped on every `present`, so a stale remediation timer cannot apply
    generation: u64,
    remediation: Option<CancellationToken>,
    closed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    AwaitingConfirmation,
    Fixing,
}

/// View-state over the most recent report.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ReportView {
    state: Arc<watch::Sender<ViewState>>,
    remediation_delay: Duration,
    token: CancellationToken,
}

impl ReportView {
    pub fn new(remediation_delay: Duration) -> Self {
        Self::with_token(remediation_delay, &CancellationToken::new())
    }

    /// Create a view torn down together with `parent`.
    pub fn with_token(remediation_delay: Duration, parent: &CancellationToken) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            state: Arc::new(state),
            remediation_delay,
            token: parent.child_token(),
        }
    }

    /// Show `report`, discarding any fix state of the previous one.
    pub fn present(&self, report: Arc<SecurityReport>) {
        self.state.send_if_modified(|state| {
            if state.closed || self.token.is_cancelled() {
                return false;
            }
            if let Some(pending) = state.remediation.take() {
                pending.cancel();
            }
            state.generation += 1;
            state.report = Some(report);
            state.all_fixed = false;
            state.phase = Phase::Idle;
            true
        });
        debug!("Report presented");
    }

    pub fn report(&self) -> Option<Arc<SecurityReport>> {
        self.state.borrow().report.clone()
    }

    pub fn all_fixed(&self) -> bool {
        self.state.borrow().all_fixed
    }

    pub fn is_safe(&self) -> bool {
        let state = self.state.borrow();
        match &state.report {
            Some(report) => state.all_fixed || !report.requires_action(),
            None => false,
        }
    }

    pub fn verdict(&self) -> Verdict {
        if self.state.borrow().report.is_none() {
            Verdict::NoReport
        } else if self.is_safe() {
            Verdict::Safe
        } else {
            Verdict::AtRisk
        }
    }

    pub fn phase(&self) -> RemediationPhase {
        let state = self.state.borrow();
        match state.phase {
            Phase::AwaitingConfirmation => RemediationPhase::AwaitingConfirmation,
            Phase::Fixing => RemediationPhase::Fixing,
            Phase::Idle if state.all_fixed => RemediationPhase::Fixed,
            Phase::Idle => RemediationPhase::Idle,
        }
    }

    /// Findings still shown to the user
    pub fn display_vulnerabilities(&self) -> Vec<Vulnerability> {
        let state = self.state.borrow();
        match &state.report {
            Some(report) if !state.all_fixed => report.vulnerabilities.clone(),
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> Option<String> {
        let state = self.state.borrow();
        let report = state.report.as_ref()?;
        if state.all_fixed {
            Some(FIXED_SUMMARY.to_string())
        } else {
            Some(report.summary.clone())
        }
    }

    /// Whether "fix all" is currently offered
    pub fn can_fix_all(&self) -> bool {
        self.check_fixable(&self.state.borrow()).is_ok()
    }

    /// Open the confirmation step. Returns the number of issues to fix.
    ///
    /// Fixing a single issue goes through the same flow.
    pub fn request_fix_all(&self) -> Result<usize, RemediationError> {
        let mut outcome = Err(RemediationError::NoReport);
        self.state.send_if_modified(|state| {
            outcome = self.check_fixable(state);
            let Ok(_) = outcome else {
                return false;
            };
            if state.phase == Phase::AwaitingConfirmation {
                return false;
            }
            state.phase = Phase::AwaitingConfirmation;
            true
        });
        outcome
    }

    /// Dismiss the confirmation step.
    pub fn cancel_fix_all(&self) -> Result<(), RemediationError> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| match state.phase {
            Phase::Fixing => {
                outcome = Err(RemediationError::InProgress);
                false
            }
            Phase::AwaitingConfirmation => {
                state.phase = Phase::Idle;
                true
            }
            Phase::Idle => false,
        });
        outcome
    }

    /// Confirm the pending request and start the remediation timer.
    pub fn confirm_fix_all(&self) -> Result<(), RemediationError> {
        let mut started = None;
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| {
            if state.closed || self.token.is_cancelled() {
                outcome = Err(RemediationError::Closed);
                return false;
            }
            match state.phase {
                Phase::AwaitingConfirmation => {}
                Phase::Fixing => {
                    outcome = Err(RemediationError::InProgress);
                    return false;
                }
                Phase::Idle if state.all_fixed => {
                    outcome = Err(RemediationError::AlreadyFixed);
                    return false;
                }
                Phase::Idle => {
                    outcome = Err(RemediationError::NotRequested);
                    return false;
                }
            }

            let token = self.token.child_token();
            state.remediation = Some(token.clone());
            state.phase = Phase::Fixing;
            started = Some((token, state.generation));
            true
        });

        if let Some((token, generation)) = started {
            info!(delay_ms = self.remediation_delay.as_millis() as u64, "Remediation started");
            tokio::spawn(remediate(
                self.state.clone(),
                token,
                generation,
                self.remediation_delay,
            ));
        }
        outcome
    }

    /// Wait until the current report is fixed. `false` if the view closes first
    /// or a new report replaces the one being fixed.
    pub async fn wait_until_fixed(&self) -> bool {
        let mut rx = self.state.subscribe();
        let generation = rx.borrow().generation;
        let fixed = rx.wait_for(|s| s.all_fixed || s.closed || s.generation != generation);

        tokio::select! {
            biased;
            _ = self.token.cancelled() => false,
            result = fixed => match result {
                Ok(state) => state.all_fixed && state.generation == generation,
                Err(_) => false,
            },
        }
    }

    /// Tear the view down. Pending timers are cancelled and later calls are no-ops.
    pub fn close(&self) {
        self.token.cancel();
        self.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            state.closed = true;
            state.remediation = None;
            state.phase = Phase::Idle;
            true
        });
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed || self.token.is_cancelled()
    }

    fn check_fixable(&self, state: &ViewState) -> Result<usize, RemediationError> {
        if state.closed || self.token.is_cancelled() {
            return Err(RemediationError::Closed);
        }
        let report = state.report.as_ref().ok_or(RemediationError::NoReport)?;
        if state.all_fixed {
            return Err(RemediationError::AlreadyFixed);
        }
        if state.phase == Phase::Fixing {
            return Err(RemediationError::InProgress);
        }
        match report.vulnerabilities.len() {
            0 => Err(RemediationError::NothingToFix),
            n => Ok(n),
        }
    }
}

async fn remediate(
    state: Arc<watch::Sender<ViewState>>,
    token: CancellationToken,
    generation: u64,
    delay: Duration,
) {
    tokio::select! {
        biased;
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }

    let applied = state.send_if_modified(|state| {
        if token.is_cancelled() || state.closed || state.generation != generation {
            return false;
        }
        state.all_fixed = true;
        state.phase = Phase::Idle;
        state.remediation = None;
        true
    });

    if applied {
        info!("All issues remediated");
    }
}
