//! Command-line entry point for the Kanmail settings screen
//!
//! Loads the settings from a running Kanmail backend, applies one command
//! through the same model the settings screen uses, and saves the result.
//! Logs go to stderr; command output goes to stdout.

mod app;
mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use kanmail_settings_client::HttpSettingsClient;
use kanmail_settings_core::{ServiceContext, SettingsModel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (stdout carries command output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.client_config()?;
    tracing::debug!("Using Kanmail backend at {}", config.base_url);

    let client = Arc::new(HttpSettingsClient::new(config)?);
    let ctx = Arc::new(ServiceContext::new(client.clone(), client));
    let mut model = SettingsModel::load(ctx).await?;

    let mut stdout = std::io::stdout().lock();
    app::execute(cli.command, &mut model, &mut stdout).await
}
