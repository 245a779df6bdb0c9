//! studio-serve - HTTP endpoints for publishing and drafting portfolio posts
//!
//! Configuration comes from the optional TOML file (`STUDIOCAST_CONFIG`)
//! and credentials from the process environment or a `.env` file.

use anyhow::{Context, Result};
use libstudiocast::credentials::{Credentials, EnvSource};
use libstudiocast::{logging, Config, Publisher};
use studio_serve::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default();

    let config = Config::load().context("Failed to load configuration")?;
    let credentials = Credentials::load(&EnvSource::new());
    let bind = config.server.bind.clone();

    let publisher = Publisher::new(config, credentials).context("Failed to build publisher")?;
    let platforms = publisher.configured_platforms();
    if platforms.is_empty() {
        warn!("No platform has complete credentials; every publish request will fail");
    } else {
        info!(
            "Publishing enabled for: {}",
            platforms
                .iter()
                .map(|p| p.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    studio_serve::serve(listener, AppState::new(publisher)).await?;

    info!("studio-serve stopped");
    Ok(())
}
