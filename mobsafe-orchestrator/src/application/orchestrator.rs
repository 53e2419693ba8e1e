//! Scan orchestrator: one simulated scan, one report request, one terminal state.
//!
//! ```text
//! start() ──► Running (progress ticks, stage ticks)
//!               │ after `duration`
//!               ▼
//!         Finalizing ── generator.generate(device) ──► progress 100, settle
//!                                                         │
//!                          Complete(report) ◄─────────────┤
//!                          Error(message)   ◄─ Surface ───┘
//! ```
//!
//! The run is a single spawned task. Every timer and the in-flight report
//! request sit inside `tokio::select!` arms guarded by the run's
//! [`CancellationToken`], so cancelling the handle (or dropping it) stops all
//! of them and nothing is published afterwards. Cancelling through the handle
//! and publishing a state both happen under the state channel's lock, so a
//! terminal state is either visible when `cancel` returns or never.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mobsafe_core::config::{FallbackPolicy, ScanConfig};
use mobsafe_core::domain::SecurityReport;
use mobsafe_llm::domain::{GenerationError, ReportGenerator};

use crate::domain::{
    INITIAL_FILE, SCANNED_FILES, ScanError, ScanEvent, ScanRun, ScanStage, ScanState, ScanStatus,
};

/// The report substituted for a failed generation under
/// [`FallbackPolicy::SyntheticSafe`].
pub fn fallback_report(now: chrono::DateTime<Utc>) -> SecurityReport {
    SecurityReport::fallback(now)
}

/// Drives a single scan cycle against a [`ReportGenerator`].
pub struct ScanOrchestrator {
    generator: Arc<dyn ReportGenerator>,
    config: ScanConfig,
    started: AtomicBool,
}

impl ScanOrchestrator {
    pub fn new(generator: Arc<dyn ReportGenerator>, config: ScanConfig) -> Self {
        Self {
            generator,
            config,
            started: AtomicBool::new(false),
        }
    }

    /// Start the scan with its own cancellation root.
    pub fn start(&self, device: &str) -> Result<ScanHandle, ScanError> {
        self.start_with_token(device, &CancellationToken::new())
    }

    /// Start the scan under `parent`; cancelling the parent tears the scan down.
    pub fn start_with_token(
        &self,
        device: &str,
        parent: &CancellationToken,
    ) -> Result<ScanHandle, ScanError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ScanError::AlreadyStarted);
        }

        let mut run = ScanRun::new(device);
        run.transition(ScanStatus::Running, Some("Scan started".into()))?;

        let token = parent.child_token();
        let (state_tx, state_rx) = watch::channel(ScanState::Running {
            progress: 0.0,
            stage: ScanStage::Initializing,
            current_file: INITIAL_FILE,
        });
        let state_tx = Arc::new(state_tx);
        let (event_tx, event_rx) = mpsc::channel(1);

        let id = run.id;
        info!(scan_id = %id, device, "Scan started");

        let task = ScanTask {
            generator: self.generator.clone(),
            config: self.config.clone(),
            token: token.clone(),
            state: state_tx.clone(),
            events: event_tx,
            progress: 0.0,
            stage: ScanStage::Initializing,
            current_file: INITIAL_FILE,
        };
        let join = tokio::spawn(task.run(run));

        Ok(ScanHandle {
            id,
            token,
            publisher: state_tx,
            state: state_rx,
            events: event_rx,
            task: Some(join),
        })
    }
}

/// Caller's side of a running scan. Dropping it cancels the scan.
pub struct ScanHandle {
    id: Uuid,
    token: CancellationToken,
    publisher: Arc<watch::Sender<ScanState>>,
    state: watch::Receiver<ScanState>,
    events: mpsc::Receiver<ScanEvent>,
    task: Option<JoinHandle<ScanRun>>,
}

impl ScanHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest published state
    pub fn state(&self) -> ScanState {
        self.state.borrow().clone()
    }

    /// Receiver for observing every state change
    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state.clone()
    }

    /// Wait for the terminal event. Returns `None` once the scan was cancelled.
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    pub fn cancel(&self) {
        self.publisher.send_if_modified(|_| {
            self.token.cancel();
            false
        });
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the task to finish and return the run with its audit trail.
    pub async fn join(mut self) -> Option<ScanRun> {
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

struct ScanTask {
    generator: Arc<dyn ReportGenerator>,
    config: ScanConfig,
    token: CancellationToken,
    state: Arc<watch::Sender<ScanState>>,
    events: mpsc::Sender<ScanEvent>,
    progress: f64,
    stage: ScanStage,
    current_file: &'static str,
}

impl ScanTask {
    async fn run(mut self, mut run: ScanRun) -> ScanRun {
        let Some(result) = self.simulate_and_generate(&run.device).await else {
            return self.cancelled(run);
        };

        self.progress = 100.0;
        self.stage = ScanStage::Complete;
        self.publish_running();

        tokio::select! {
            biased;
            _ = self.token.cancelled() => return self.cancelled(run),
            _ = tokio::time::sleep(self.config.settle()) => {}
        }

        let (state, event, status, reason) = match result {
            Ok(report) => {
                let report = Arc::new(report);
                let reason = format!("Report received with {} threats", report.threats_detected);
                (
                    ScanState::Complete(report.clone()),
                    ScanEvent::Completed(report),
                    ScanStatus::Complete,
                    reason,
                )
            }
            Err(err) => match self.config.fallback {
                FallbackPolicy::SyntheticSafe => {
                    warn!(
                        scan_id = %run.id,
                        error = %err,
                        retryable = err.is_retryable(),
                        "Report generation failed, using fallback report"
                    );
                    let report = Arc::new(fallback_report(Utc::now()));
                    (
                        ScanState::Complete(report.clone()),
                        ScanEvent::Completed(report),
                        ScanStatus::Complete,
                        format!("Fallback report after: {}", err),
                    )
                }
                FallbackPolicy::Surface => {
                    warn!(
                        scan_id = %run.id,
                        error = %err,
                        retryable = err.is_retryable(),
                        "Report generation failed"
                    );
                    run.error = Some(err.to_string());
                    (
                        ScanState::Error(err.to_string()),
                        ScanEvent::Failed(err.clone()),
                        ScanStatus::Error,
                        err.to_string(),
                    )
                }
            },
        };

        if !run.status.can_transition_to(&status) {
            warn!(scan_id = %run.id, from = %run.status, to = %status, "Dropping terminal transition");
            return run;
        }
        if !self.publish(state) {
            return self.cancelled(run);
        }
        if let Err(e) = run.transition(status, Some(reason)) {
            warn!(scan_id = %run.id, error = %e, "Terminal transition not recorded");
        }

        // The caller may have stopped listening; the state channel still has the result.
        let _ = self.events.try_send(event);

        info!(scan_id = %run.id, status = %run.status, "Scan finished");
        run
    }

    /// Tick progress for the configured duration, then request the report
    /// while progress keeps ticking. `None` when cancelled.
    async fn simulate_and_generate(
        &mut self,
        device: &str,
    ) -> Option<Result<SecurityReport, GenerationError>> {
        let progress_period = self.config.progress_tick();
        let stage_period = self.config.stage_tick();
        let start = Instant::now();
        let mut progress_tick = interval_at(start + progress_period, progress_period);
        let mut stage_tick = interval_at(start + stage_period, stage_period);

        let deadline = tokio::time::sleep(self.config.duration());
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return None,
                _ = &mut deadline => break,
                _ = progress_tick.tick() => self.advance_progress(),
                _ = stage_tick.tick() => self.advance_stage(),
            }
        }

        self.stage = ScanStage::Finalizing;
        self.publish_running();
        debug!(device, "Requesting report");

        let generator = self.generator.clone();
        let generate = generator.generate(device);
        tokio::pin!(generate);

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return None,
                result = &mut generate => return Some(result),
                _ = progress_tick.tick() => self.advance_progress(),
                _ = stage_tick.tick() => self.advance_stage(),
            }
        }
    }

    fn advance_progress(&mut self) {
        let next = (self.progress + self.config.progress_step).min(self.config.progress_hold);
        if next > self.progress {
            self.progress = next;
            self.publish_running();
        }
    }

    fn advance_stage(&mut self) {
        self.current_file = pick_file();
        if self.stage != ScanStage::Finalizing {
            if let Some(stage) = ScanStage::for_progress(self.progress) {
                self.stage = stage;
            }
        }
        self.publish_running();
    }

    fn publish_running(&self) {
        self.publish(ScanState::Running {
            progress: self.progress,
            stage: self.stage,
            current_file: self.current_file,
        });
    }

    /// Replace the published state unless the run was cancelled. Returns
    /// whether the state was applied.
    fn publish(&self, next: ScanState) -> bool {
        self.state.send_if_modified(|current| {
            if self.token.is_cancelled() {
                return false;
            }
            *current = next;
            true
        })
    }

    fn cancelled(&self, mut run: ScanRun) -> ScanRun {
        info!(scan_id = %run.id, "Scan cancelled");
        run.cancelled = true;
        run
    }
}

fn pick_file() -> &'static str {
    SCANNED_FILES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(INITIAL_FILE)
}
