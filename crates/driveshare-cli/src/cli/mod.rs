//! CLI entry and dispatch.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use driveshare_core::api::DriveShareClient;
use driveshare_core::config::Config;
use driveshare_core::session::SessionState;

mod shell;

#[derive(Parser)]
#[command(name = "driveshare")]
#[command(version)]
#[command(about = "DriveShare rental marketplace client")]
struct Cli {
    /// Backend base URL (overrides DRIVESHARE_BASE_URL and config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Load configuration from a specific file
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    };
    let base_url = config.resolve_base_url(cli.base_url.as_deref())?;
    tracing::debug!(%base_url, "resolved backend base URL");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let api = DriveShareClient::with_timeout(base_url, config.request_timeout())
        .context("failed to construct HTTP client")?;

    let mut shell = shell::Shell::new(api, SessionState::new());
    shell.run(&runtime)
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
