// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Dashboard API Server
//!
//! Authenticates a single user against Strava, caches their activity
//! history locally and serves aggregate statistics to the web UI.

use std::sync::Arc;

use strava_dashboard::{
    config::Config,
    services::{ActivityCache, StravaClient, TokenManager, TokenStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Strava-Dashboard API");

    let strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );

    // Token mirror is loaded from disk once here and then lives in memory
    let tokens = TokenManager::new(strava.clone(), TokenStore::new(config.tokens_path()));
    let cache = ActivityCache::new(config.activities_path());
    tracing::info!(
        data_dir = %config.data_dir.display(),
        cache_present = cache.exists(),
        "Local state initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
        tokens,
        cache,
    });

    // Build router
    let app = strava_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_dashboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
