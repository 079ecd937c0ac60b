// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync and import endpoints.
//!
//! A sync that ran to completion answers 200 with its report, even when
//! individual records failed. Only rejected input or a fatal provider
//! failure produce an error status.

use crate::error::{AppError, Result};
use crate::sync::{self, SyncReport, TrainingPeaksImport};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sync/garmin", post(sync_garmin))
        .route("/api/sync/strava", post(sync_strava))
        .route("/api/import/trainingpeaks", post(import_trainingpeaks))
}

async fn sync_garmin(State(state): State<Arc<AppState>>) -> Result<Json<SyncReport>> {
    let credentials = state
        .config
        .garmin
        .as_ref()
        .ok_or(AppError::NotConfigured("Garmin"))?;

    let today = chrono::Local::now().date_naive();
    let report = sync::sync_garmin(
        state.garmin.as_ref(),
        &state.db,
        credentials,
        &state.config.sync,
        today,
    )
    .await?;

    Ok(Json(report))
}

async fn sync_strava(State(state): State<Arc<AppState>>) -> Result<Json<SyncReport>> {
    let credentials = state
        .config
        .strava
        .as_ref()
        .ok_or(AppError::NotConfigured("Strava"))?;

    let report = sync::sync_strava(
        state.strava.as_ref(),
        &state.db,
        credentials,
        &state.config.sync,
    )
    .await?;

    Ok(Json(report))
}

async fn import_trainingpeaks(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TrainingPeaksImport>, JsonRejection>,
) -> Result<Json<SyncReport>> {
    let Json(import) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let report = sync::import_trainingpeaks(&state.db, &import).await?;
    Ok(Json(report))
}
