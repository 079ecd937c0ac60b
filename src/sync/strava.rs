// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava sync: refresh the access token, then page through the athlete's
//! activities until a short page.

use super::{ingest, SyncReport};
use crate::adapters::{ActivityAdapter, Strava};
use crate::config::{StravaCredentials, SyncSettings};
use crate::db::Database;
use crate::error::AppError;
use crate::services::StravaApi;

/// Upper bound on pages fetched in one sync.
pub const MAX_PAGES: u32 = 50;

pub async fn sync_strava(
    api: &dyn StravaApi,
    db: &Database,
    credentials: &StravaCredentials,
    settings: &SyncSettings,
) -> Result<SyncReport, AppError> {
    let per_page = settings.strava_page_size.max(1);
    tracing::info!(per_page, "Starting Strava sync");

    let access_token = api.refresh_token(credentials).await.map_err(|e| {
        tracing::error!(error = %e, "Strava token refresh failed");
        e
    })?;

    let mut report = SyncReport::new("strava");

    for page in 1..=MAX_PAGES {
        let batch = match api.list_activities(&access_token, page, per_page).await {
            Ok(batch) => batch,
            Err(e) if page == 1 => {
                tracing::error!(error = %e, "Strava activity fetch failed");
                return Err(e);
            }
            Err(e) => {
                report.activities.record_error(format!("page {}", page), e);
                break;
            }
        };

        tracing::debug!(page, count = batch.len(), "Fetched Strava page");

        for raw in &batch {
            let label = format!("activity {}", raw.get("id").cloned().unwrap_or_default());
            ingest(db, &mut report.activities, label, Strava::activity(raw)).await;
        }

        if batch.len() < per_page as usize {
            break;
        }
    }

    report.log_summary();
    Ok(report)
}
