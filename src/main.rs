//! MobSafe - command line entry point

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use mobsafe::cli::{Cli, CliApp, exit_codes};
use mobsafe::{Config, create_app, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Failed to load configuration. Check config/*.toml and MOBSAFE__* env vars: {}",
                e
            );
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };
    cli.apply_to(&mut config);

    init_tracing(&config.logging)?;
    tracing::debug!(
        model = %config.llm.default_model,
        fallback = ?config.scan.fallback,
        "Configuration loaded"
    );

    let app = create_app(config)?;
    tokio::spawn(shutdown_signal(app.shutdown_token.clone()));

    let exit_code = CliApp::new(cli, app).run().await?;
    std::process::exit(exit_code);
}

/// Cancel the running scan on Ctrl+C
async fn shutdown_signal(shutdown_token: CancellationToken) {
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, cancelling scan");
                shutdown_token.cancel();
            }
            Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
        },
        _ = shutdown_token.cancelled() => {}
    }
}
