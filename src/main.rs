// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Hub API Server
//!
//! Syncs Garmin Connect and Strava, imports TrainingPeaks exports and
//! serves the combined data.

use anyhow::Context;
use fitness_hub::{
    config::Config,
    db::Database,
    services::{GarminClient, StravaClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        port = config.port,
        garmin = config.garmin.is_some(),
        strava = config.strava.is_some(),
        "Starting Fitness Hub API"
    );

    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to open database")?;

    let garmin = GarminClient::new().context("Failed to build Garmin client")?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        garmin: Arc::new(garmin),
        strava: Arc::new(StravaClient::new()),
    });

    // Build router
    let app = fitness_hub::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitness_hub=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();

    Ok(())
}
