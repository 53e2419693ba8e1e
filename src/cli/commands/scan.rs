//! Scan Command - run one scan cycle and present the report

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::debug;

use mobsafe_core::domain::UserRole;
use mobsafe_orchestrator::{ScanEvent, ScanState};

use crate::app::AppHandle;
use crate::cli::exit_codes;
use crate::cli::output::OutputWriter;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Device descriptor (defaults to `scan.default_device`)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Confirm "fix all" when the report lists threats
    #[arg(long)]
    pub fix: bool,

    /// End the scan with an error instead of a fallback report when generation fails
    #[arg(long)]
    pub surface_failures: bool,

    /// Demo account to sign in with
    #[arg(long, value_enum, default_value = "user")]
    pub role: CliRole,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliRole {
    User,
    Admin,
}

impl From<CliRole> for UserRole {
    fn from(role: CliRole) -> Self {
        match role {
            CliRole::User => UserRole::User,
            CliRole::Admin => UserRole::Admin,
        }
    }
}

pub async fn run(app: &mut AppHandle, output: &OutputWriter, args: &ScanArgs) -> Result<i32> {
    let user = app.session.sign_in(args.role.into())?;
    let device = args
        .device
        .clone()
        .unwrap_or_else(|| app.config.scan.default_device.clone());
    output.info(&format!("Signed in as {} <{}>", user.name, user.email));
    output.info(&format!("Scanning {}", device));

    let mut handle = app.session.start_scan(Some(&device))?;
    let mut states = handle.subscribe();

    let event = loop {
        tokio::select! {
            biased;
            event = handle.next_event() => break event,
            changed = states.changed() => {
                if changed.is_err() {
                    break handle.next_event().await;
                }
                let state: ScanState = states.borrow_and_update().clone();
                output.progress(&state);
            }
        }
    };
    output.finish_progress();

    let report = match event {
        Some(ScanEvent::Completed(report)) => report,
        Some(ScanEvent::Failed(err)) => {
            output.error(&format!("Scan failed: {}", err));
            return Ok(exit_codes::SCAN_FAILED);
        }
        None => {
            output.warn("Scan cancelled");
            return Ok(exit_codes::CANCELLED);
        }
    };

    app.session.record_report(report)?;
    let view = app.session.report_view();

    if args.fix && view.can_fix_all() {
        let issues = view.request_fix_all()?;
        view.confirm_fix_all()?;
        output.info(&format!("Fixing {} issue(s)...", issues));

        if !view.wait_until_fixed().await {
            output.warn("Remediation interrupted");
            return Ok(exit_codes::CANCELLED);
        }
    }

    output.report(&device, &view)?;

    if let Some(alerts) = &app.alerts {
        if let Some(alert) = alerts.current() {
            output.alert(&alert);
            alerts.dismiss();
        }
    }

    debug!(verdict = ?view.verdict(), "Scan command finished");
    Ok(if view.is_safe() {
        exit_codes::SUCCESS
    } else {
        exit_codes::THREATS_FOUND
    })
}
