//! MobSafe CLI - run a simulated device scan from the terminal
//!
//! The binary drives the same session controller a UI would: sign in, start a
//! scan, render progress, present the report and optionally "fix all".

mod commands;
pub mod output;

pub use output::{OutputFormat, OutputWriter};

use clap::{Parser, Subcommand, ValueEnum};

use mobsafe_core::Config;
use mobsafe_core::config::FallbackPolicy;

use crate::app::AppHandle;

/// MobSafe - AI assisted mobile device security scan
#[derive(Parser, Debug)]
#[command(
    name = "mobsafe",
    version,
    about = "Simulated mobile security scan with an AI generated report",
    long_about = "MobSafe runs a simulated device scan, asks a language model for a structured \
                  security report and lets you remediate the findings.\n\n\
                  Set GOOGLE_AI_KEY (or MOBSAFE__LLM__GOOGLE_AI__API_KEY) to enable the \
                  report generator. Without a key every scan ends with the fallback report."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: CliOutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a device and print the security report
    #[command(visible_alias = "s")]
    Scan(commands::scan::ScanArgs),
}

/// Output format for CLI results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CliOutputFormat {
    /// Human readable report (default)
    #[default]
    Table,
    /// JSON output for machine processing
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Fold command line switches into the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if self.verbose {
            config.logging.level = "debug".to_string();
        }

        match &self.command {
            Commands::Scan(args) => {
                if args.surface_failures {
                    config.scan.fallback = FallbackPolicy::Surface;
                }
            }
        }
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    app: AppHandle,
}

impl CliApp {
    pub fn new(cli: Cli, app: AppHandle) -> Self {
        Self { cli, app }
    }

    /// Run the selected command and return the process exit code
    pub async fn run(mut self) -> anyhow::Result<i32> {
        let output = OutputWriter::new(self.cli.format.into(), self.cli.quiet);
        let exit_code = match self.cli.command {
            Commands::Scan(ref args) => {
                commands::scan::run(&mut self.app, &output, args).await
            }
        }?;

        self.app.shutdown();
        Ok(exit_code)
    }
}

/// Exit codes for CI integration
pub mod exit_codes {
    /// Device is safe (originally or after remediation)
    pub const SUCCESS: i32 = 0;
    /// Report lists threats that were not remediated
    pub const THREATS_FOUND: i32 = 1;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// Report generation failed and failures are surfaced
    pub const SCAN_FAILED: i32 = 3;
    /// Interrupted before the scan finished
    pub const CANCELLED: i32 = 130;
}
