//! Test fixtures and a scripted report generator

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mobsafe_core::domain::{ReportOrigin, SecurityReport, Severity, ThreatLevel, Vulnerability};
use mobsafe_llm::domain::{GenerationError, ReportGenerator};

/// What the mock generator does when called
#[derive(Clone)]
pub enum Behavior {
    Succeed(SecurityReport),
    Fail(GenerationError),
    /// Never resolves
    Hang,
}

/// Report generator with scripted behavior and call accounting
pub struct MockReportGenerator {
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
    /// Set when an in-flight call is dropped before resolving
    abandoned: Arc<AtomicBool>,
}

impl MockReportGenerator {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn succeeding(report: SecurityReport) -> Self {
        Self::new(Behavior::Succeed(report))
    }

    pub fn failing(error: GenerationError) -> Self {
        Self::new(Behavior::Fail(error))
    }

    pub fn hanging() -> Self {
        Self::new(Behavior::Hang)
    }

    /// Resolve only after `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

struct AbandonGuard {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ReportGenerator for MockReportGenerator {
    async fn generate(&self, _device: &str) -> Result<SecurityReport, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut guard = AbandonGuard {
            flag: self.abandoned.clone(),
            armed: true,
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match &self.behavior {
            Behavior::Succeed(report) => Ok(report.clone()),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Hang => std::future::pending().await,
        };
        guard.armed = false;
        result
    }
}

pub fn vulnerability(id: &str, name: &str, severity: Severity) -> Vulnerability {
    Vulnerability {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} detected during scan"),
        severity,
        remediation: format!("Resolve {name}"),
    }
}

/// HIGH report with two findings
pub fn high_risk_report() -> SecurityReport {
    SecurityReport {
        overall_status: ThreatLevel::High,
        scan_date: "2025-06-01T12:00:00.000Z".to_string(),
        scanned_files_count: 1000,
        threats_detected: 2,
        summary: "Two issues need attention.".to_string(),
        vulnerabilities: vec![
            vulnerability("v1", "Outdated OS", Severity::High),
            vulnerability("v2", "Suspicious APK Permissions", Severity::Medium),
        ],
        origin: ReportOrigin::Generated,
    }
}

/// SAFE report without findings
pub fn safe_report() -> SecurityReport {
    SecurityReport {
        overall_status: ThreatLevel::Safe,
        scan_date: "2025-06-01T12:00:00.000Z".to_string(),
        scanned_files_count: 9000,
        threats_detected: 0,
        summary: "No threats found.".to_string(),
        vulnerabilities: Vec::new(),
        origin: ReportOrigin::Generated,
    }
}

/// LOW report that still lists a finding
pub fn low_risk_report() -> SecurityReport {
    SecurityReport {
        overall_status: ThreatLevel::Low,
        threats_detected: 1,
        summary: "One minor issue.".to_string(),
        vulnerabilities: vec![vulnerability("v3", "Unusual Network Traffic", Severity::Low)],
        ..safe_report()
    }
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
