use std::sync::Arc;

use anyhow::Context;
use isp_access_gate::{app, config, is_production, Gate};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting ISP access gate in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::error!("JWT_SECRET is not set; every session will be treated as logged out");
    }

    let gate_config = config.gate_config().context("invalid gate route configuration")?;
    let gate = Arc::new(Gate::new(gate_config));

    // Allow tests or deployments to override port via env
    let port = std::env::var("GATE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("ISP access gate listening on http://{}", bind_addr);

    axum::serve(listener, app(gate)).await.context("server error")?;
    Ok(())
}
