//! Terminal rendering for scan progress and reports

use std::io::Write;

use colored::*;
use serde::Serialize;

use mobsafe_core::domain::{SecurityReport, Severity, ThreatLevel, Vulnerability};
use mobsafe_orchestrator::{ReportView, ScanState, SecurityAlert, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Report as printed by `--format json`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutput<'a> {
    pub device: &'a str,
    pub verdict: Verdict,
    pub all_fixed: bool,
    pub fallback: bool,
    pub summary: Option<String>,
    pub open_vulnerabilities: Vec<Vulnerability>,
    pub report: &'a SecurityReport,
}

/// Writes results to stdout and progress/diagnostics to stderr
pub struct OutputWriter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn interactive(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Table
    }

    pub fn info(&self, message: &str) {
        if self.interactive() {
            eprintln!("{} {}", "›".bright_blue(), message);
        }
    }

    pub fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", "!".yellow().bold(), message);
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message);
    }

    /// Redraw the single progress line
    pub fn progress(&self, state: &ScanState) {
        if !self.interactive() {
            return;
        }
        if let ScanState::Running {
            progress,
            stage,
            current_file,
        } = state
        {
            const WIDTH: usize = 30;
            let filled = ((progress / 100.0) * WIDTH as f64).round() as usize;
            let bar = format!(
                "{}{}",
                "█".repeat(filled.min(WIDTH)),
                "░".repeat(WIDTH - filled.min(WIDTH))
            );
            eprint!(
                "\r\x1b[2K{} {:>5.1}% {} {}",
                bar.green(),
                progress,
                stage.label().bold(),
                current_file.dimmed()
            );
            let _ = std::io::stderr().flush();
        }
    }

    pub fn finish_progress(&self) {
        if self.interactive() {
            eprint!("\r\x1b[2K");
            let _ = std::io::stderr().flush();
        }
    }

    /// Print the report as currently seen through `view`
    pub fn report(&self, device: &str, view: &ReportView) -> anyhow::Result<()> {
        let Some(report) = view.report() else {
            println!("No report data found.");
            return Ok(());
        };

        match self.format {
            OutputFormat::Json => {
                let output = ScanOutput {
                    device,
                    verdict: view.verdict(),
                    all_fixed: view.all_fixed(),
                    fallback: report.is_fallback(),
                    summary: view.summary(),
                    open_vulnerabilities: view.display_vulnerabilities(),
                    report: &report,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => self.report_table(device, view, &report),
        }
        Ok(())
    }

    fn report_table(&self, device: &str, view: &ReportView, report: &SecurityReport) {
        println!();
        println!("{}", "     MOBSAFE SECURITY REPORT".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!("Device:         {}", device);
        println!("Scanned:        {}", report.scan_date);
        println!("Files scanned:  {}", report.scanned_files_count);
        println!("Status:         {}", status_label(report.overall_status));

        let verdict = match view.verdict() {
            Verdict::Safe => "SAFE".green().bold(),
            Verdict::AtRisk => "AT RISK".red().bold(),
            Verdict::NoReport => "NO REPORT".dimmed(),
        };
        println!("Verdict:        {}", verdict);
        if report.is_fallback() {
            println!(
                "{}",
                "(report generator unavailable, showing fallback report)".yellow()
            );
        }

        if let Some(summary) = view.summary() {
            println!("\n{}", summary);
        }

        let open = view.display_vulnerabilities();
        if open.is_empty() {
            if view.all_fixed() {
                println!("\n{}", "✓ All threats neutralized".green().bold());
            } else {
                println!("\n{}", "✓ No threats detected".green());
            }
            return;
        }

        println!("\n{} ({})", "Threats".bold(), open.len());
        for vulnerability in &open {
            println!(
                "\n  {} {} [{}]",
                severity_label(vulnerability.severity),
                vulnerability.name.bright_white().bold(),
                vulnerability.id.dimmed()
            );
            println!("    {}", vulnerability.description);
            println!("    {} {}", "Fix:".cyan(), vulnerability.remediation);
        }
        println!();
    }

    pub fn alert(&self, alert: &SecurityAlert) {
        if self.interactive() {
            eprintln!(
                "{} {}: {}",
                "🛡".green(),
                alert.title.green().bold(),
                alert.message
            );
        }
    }
}

fn status_label(level: ThreatLevel) -> ColoredString {
    match level {
        ThreatLevel::Critical => level.as_str().red().bold(),
        ThreatLevel::High => level.as_str().red(),
        ThreatLevel::Medium => level.as_str().yellow(),
        ThreatLevel::Low => level.as_str().cyan(),
        ThreatLevel::Safe => level.as_str().green(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    status_label(severity.into())
}
