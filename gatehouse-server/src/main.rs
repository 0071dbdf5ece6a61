//! Gatehouse server entry point: load configuration, run migrations, wire
//! the Postgres-backed store into the core and serve.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use gatehouse_core::auth::token::TokenService;
use gatehouse_core::store::PostgresUserStore;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse_server::config::ServerConfig;
use gatehouse_server::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    gatehouse_core::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let tokens = TokenService::new(
        &config.jwt_secret,
        Duration::seconds(config.token_ttl_secs),
    );
    let store = Arc::new(PostgresUserStore::new(pool));
    let state = AppState::new(store, tokens, config.mask_credential_errors)
        .context("failed to build application state")?;

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "gatehouse listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
