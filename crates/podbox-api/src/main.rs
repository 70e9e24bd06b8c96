//! # podbox-api: Binary Entry Point
//!
//! Loads configuration and pipeline definitions from the environment and
//! serves the issuance API.

use anyhow::Context;
use podbox_api::config::AppConfig;
use podbox_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");
    if config.admin_token.is_none() {
        tracing::warn!("PODBOX_ADMIN_TOKEN not set; pipeline info will refuse every request");
    }

    let port = config.port;
    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!("pipeline bootstrap failed: {e}");
        e
    })?;

    let app = podbox_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("podbox API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; the filter comes from
/// `RUST_LOG` and defaults to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
