//! Ledger service: entry point.
//!
//! Moves money between clients and contractors (job settlement and capped
//! deposits) under SQLite transactions, and reports top earners over a date
//! window. Everything is exposed through a small Axum REST API.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod guard;
mod leaders;
mod seed;
mod transfer;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_leaders;
#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config).await?;

    if config.seed_demo_data {
        seed::seed_demo_data(&pool).await?;
    }

    let app = api::router(Arc::new(api::ApiState { pool }));

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
