//! Session controller: signed-in user, last report and scans tied to the session.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use mobsafe_core::config::{RemediationConfig, ScanConfig};
use mobsafe_core::domain::{SecurityReport, User, UserRole};
use mobsafe_llm::domain::ReportGenerator;

use crate::application::orchestrator::{ScanHandle, ScanOrchestrator};
use crate::application::report_view::ReportView;
use crate::domain::SessionError;

/// Read-only projection of the session for leaf views
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub current_user: Option<Arc<User>>,
    pub last_report: Option<Arc<SecurityReport>>,
}

impl SessionSnapshot {
    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

pub struct SessionController {
    generator: Arc<dyn ReportGenerator>,
    scan_config: ScanConfig,
    remediation_config: RemediationConfig,
    parent: CancellationToken,
    /// Cancelled and replaced on sign-out
    token: CancellationToken,
    current_user: Option<Arc<User>>,
    last_report: Option<Arc<SecurityReport>>,
}

impl SessionController {
    pub fn new(
        generator: Arc<dyn ReportGenerator>,
        scan_config: ScanConfig,
        remediation_config: RemediationConfig,
        parent: CancellationToken,
    ) -> Self {
        let token = parent.child_token();
        Self {
            generator,
            scan_config,
            remediation_config,
            parent,
            token,
            current_user: None,
            last_report: None,
        }
    }

    /// Mock sign-in with the demo identity for `role`.
    pub fn sign_in(&mut self, role: UserRole) -> Result<Arc<User>, SessionError> {
        if role == UserRole::Guest {
            return Err(SessionError::GuestNotAllowed);
        }

        let user = Arc::new(User::demo(role));
        info!(user = %user.name, role = %user.role, "Signed in");
        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Clear the session and tear down every scan and view started in it.
    pub fn sign_out(&mut self) {
        self.token.cancel();
        self.token = self.parent.child_token();

        if let Some(user) = self.current_user.take() {
            info!(user = %user.name, "Signed out");
        }
        self.last_report = None;
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.current_user.clone()
    }

    pub fn last_report(&self) -> Option<Arc<SecurityReport>> {
        self.last_report.clone()
    }

    /// Start a scan of `device`, or of the configured default device.
    pub fn start_scan(&self, device: Option<&str>) -> Result<ScanHandle, SessionError> {
        if self.current_user.is_none() {
            return Err(SessionError::NotSignedIn);
        }

        let device = device.unwrap_or(&self.scan_config.default_device);
        let orchestrator = ScanOrchestrator::new(self.generator.clone(), self.scan_config.clone());
        Ok(orchestrator.start_with_token(device, &self.token)?)
    }

    /// Store the report of a completed scan, replacing the previous one.
    pub fn record_report(&mut self, report: Arc<SecurityReport>) -> Result<(), SessionError> {
        if self.current_user.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        self.last_report = Some(report);
        Ok(())
    }

    /// A view over the last report, torn down on sign-out.
    pub fn report_view(&self) -> ReportView {
        let view = ReportView::with_token(self.remediation_config.delay(), &self.token);
        if let Some(report) = &self.last_report {
            view.present(report.clone());
        }
        view
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_user: self.current_user.clone(),
            last_report: self.last_report.clone(),
        }
    }
}
