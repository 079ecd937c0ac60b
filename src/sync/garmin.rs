// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect sync: one bulk activity fetch, then per-day sleep and
//! stress for the most recent days.

use super::{ingest, SyncReport};
use crate::adapters::{ActivityAdapter, Garmin, SleepAdapter, StressAdapter};
use crate::config::{GarminCredentials, SyncSettings};
use crate::db::Database;
use crate::error::AppError;
use crate::services::GarminApi;
use crate::time_utils::recent_days;
use chrono::NaiveDate;
use serde_json::Value;

pub async fn sync_garmin(
    api: &dyn GarminApi,
    db: &Database,
    credentials: &GarminCredentials,
    settings: &SyncSettings,
    today: NaiveDate,
) -> Result<SyncReport, AppError> {
    tracing::info!(
        limit = settings.garmin_activity_limit,
        days = settings.garmin_health_days,
        "Starting Garmin sync"
    );

    let session = api.login(credentials).await.map_err(|e| {
        tracing::error!(error = %e, "Garmin login failed");
        e
    })?;

    let activities = api
        .activities(&session, 0, settings.garmin_activity_limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Garmin activity fetch failed");
            e
        })?;

    let mut report = SyncReport::new("garmin");

    for raw in &activities {
        ingest(
            db,
            &mut report.activities,
            activity_label(raw),
            Garmin::activity(raw),
        )
        .await;
    }

    for date in recent_days(today, settings.garmin_health_days) {
        match api.sleep(&session, date).await {
            Ok(Some(raw)) => {
                ingest(
                    db,
                    &mut report.sleep,
                    format!("sleep {}", date),
                    Garmin::sleep(date, &raw),
                )
                .await
            }
            Ok(None) => report.sleep.skipped += 1,
            Err(e) => report.sleep.record_error(format!("sleep {}", date), e),
        }

        match api.stress(&session, date).await {
            Ok(Some(raw)) => {
                ingest(
                    db,
                    &mut report.stress,
                    format!("stress {}", date),
                    Garmin::stress(date, &raw),
                )
                .await
            }
            Ok(None) => report.stress.skipped += 1,
            Err(e) => report.stress.record_error(format!("stress {}", date), e),
        }
    }

    report.log_summary();
    Ok(report)
}

fn activity_label(raw: &Value) -> String {
    match raw.get("activityId") {
        Some(id) if !id.is_null() => format!("activity {}", id),
        _ => "activity <unknown>".to_string(),
    }
}
