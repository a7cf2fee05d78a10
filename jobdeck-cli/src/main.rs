//! Jobdeck
//!
//! Terminal dashboard for the job backend: a live job table with stat cards,
//! refreshed in place and driven by typed commands.

mod app;
mod commands;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jobdeck_client::BackendClient;
use jobdeck_dashboard::DashboardConfig;
use jobdeck_dashboard::config::{API_URL_ENV, DEFAULT_API_URL};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;

#[derive(Parser)]
#[command(name = "jobdeck")]
#[command(about = "Job dashboard for the job backend", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the table on stdout stays readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jobdeck=info,jobdeck_dashboard=info,jobdeck_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DashboardConfig::new(cli.api_url);
    config.validate().context("Invalid configuration")?;
    info!("Connecting to backend at {}", config.api_url);

    let client = Arc::new(BackendClient::new(config.api_url.clone()));

    App::new(config, client).run().await
}
