// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read API for the dashboard.

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivitySource, SleepRecord, StressRecord};
use crate::normalize::seconds_to_hours;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/sleep", get(get_sleep))
        .route("/api/stress", get(get_stress))
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<u32>,
    /// Activity source filter (`garmin`, `strava`, `trainingpeaks`)
    source: Option<String>,
}

impl ListQuery {
    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}

fn parse_query(query: std::result::Result<Query<ListQuery>, QueryRejection>) -> Result<ListQuery> {
    query
        .map(|Query(q)| q)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

// ─── Activities ──────────────────────────────────────────────

async fn get_activities(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Activity>>> {
    let params = parse_query(query)?;

    let source = params
        .source
        .as_deref()
        .map(str::parse::<ActivitySource>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    tracing::debug!(limit = params.limit(), source = ?source, "Fetching activities");

    let activities = state.db.list_activities(params.limit(), source).await?;
    Ok(Json(activities))
}

// ─── Sleep ───────────────────────────────────────────────────

/// Sleep row with durations also given in hours.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SleepView {
    #[serde(flatten)]
    pub record: SleepRecord,
    pub total_sleep_hours: Option<f64>,
    pub deep_sleep_hours: Option<f64>,
    pub light_sleep_hours: Option<f64>,
    pub rem_sleep_hours: Option<f64>,
    pub awake_hours: Option<f64>,
}

impl From<SleepRecord> for SleepView {
    fn from(record: SleepRecord) -> Self {
        Self {
            total_sleep_hours: seconds_to_hours(record.total_sleep),
            deep_sleep_hours: seconds_to_hours(record.deep_sleep),
            light_sleep_hours: seconds_to_hours(record.light_sleep),
            rem_sleep_hours: seconds_to_hours(record.rem_sleep),
            awake_hours: seconds_to_hours(record.awake),
            record,
        }
    }
}

async fn get_sleep(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<SleepView>>> {
    let params = parse_query(query)?;
    let rows = state.db.list_sleep(params.limit()).await?;
    Ok(Json(rows.into_iter().map(SleepView::from).collect()))
}

// ─── Stress ──────────────────────────────────────────────────

async fn get_stress(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<StressRecord>>> {
    let params = parse_query(query)?;
    let rows = state.db.list_stress(params.limit()).await?;
    Ok(Json(rows))
}
