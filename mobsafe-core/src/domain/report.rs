//! Security report produced by one scan cycle

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Summary shown when the report had to be synthesized locally
pub const FALLBACK_SUMMARY: &str =
    "Scan completed successfully. No immediate threats were detected on your device.";

/// Nominal file count of a synthesized report
pub const FALLBACK_SCANNED_FILES: u64 = 12_450;

/// Constraints a deserialized report can still violate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportValidationError {
    #[error("scanDate is not an ISO 8601 timestamp: {0:?}")]
    InvalidScanDate(String),

    #[error("duplicate vulnerability id: {0:?}")]
    DuplicateVulnerabilityId(String),
}

/// Coarse verdict of a whole report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// SAFE and LOW need no action from the user.
    pub fn requires_action(&self) -> bool {
        match self {
            Self::Safe | Self::Low => false,
            Self::Medium | Self::High | Self::Critical => true,
        }
    }
}

impl std::fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a single finding. There is no SAFE finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for ThreatLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => ThreatLevel::Low,
            Severity::Medium => ThreatLevel::Medium,
            Severity::High => ThreatLevel::High,
            Severity::Critical => ThreatLevel::Critical,
        }
    }
}

/// One discrete issue within a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub remediation: String,
}

/// Where a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportOrigin {
    /// Returned by the report generator
    #[default]
    Generated,
    /// Synthesized after the generator failed
    Fallback,
}

/// Structured output of one scan cycle.
///
/// The wire format is the camelCase JSON object requested from the generator.
/// `origin` is local bookkeeping and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub overall_status: ThreatLevel,
    /// ISO 8601 timestamp, kept as received
    pub scan_date: String,
    pub scanned_files_count: u64,
    pub threats_detected: u64,
    pub summary: String,
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(skip)]
    pub origin: ReportOrigin,
}

impl SecurityReport {
    /// The optimistic report used when generation fails.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            overall_status: ThreatLevel::Safe,
            scan_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            scanned_files_count: FALLBACK_SCANNED_FILES,
            threats_detected: 0,
            summary: FALLBACK_SUMMARY.to_string(),
            vulnerabilities: Vec::new(),
            origin: ReportOrigin::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ReportOrigin::Fallback
    }

    pub fn requires_action(&self) -> bool {
        self.overall_status.requires_action()
    }

    /// Parsed `scan_date`, if it is a valid RFC 3339 timestamp
    pub fn scanned_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.scan_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Check the invariants serde cannot express: a parseable `scan_date`
    /// and vulnerability ids unique within the report.
    pub fn validate(&self) -> Result<(), ReportValidationError> {
        if self.scanned_at().is_none() {
            return Err(ReportValidationError::InvalidScanDate(self.scan_date.clone()));
        }

        let mut seen = HashSet::with_capacity(self.vulnerabilities.len());
        for vulnerability in &self.vulnerabilities {
            if !seen.insert(vulnerability.id.as_str()) {
                return Err(ReportValidationError::DuplicateVulnerabilityId(
                    vulnerability.id.clone(),
                ));
            }
        }
        Ok(())
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.vulnerabilities.iter().map(|v| v.severity).max()
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for vulnerability in &self.vulnerabilities {
            match vulnerability.severity {
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }

    /// Align `threats_detected` with the enumerated findings.
    ///
    /// Returns the upstream count when it disagreed with the list length.
    pub fn reconcile_threat_count(&mut self) -> Option<u64> {
        let enumerated = self.vulnerabilities.len() as u64;
        if self.threats_detected == enumerated {
            return None;
        }
        let reported = self.threats_detected;
        self.threats_detected = enumerated;
        Some(reported)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}
