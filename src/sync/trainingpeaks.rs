// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TrainingPeaks import. Push-based: the caller supplies the exported
//! workout rows and metric rows in one request.

use super::{ingest, SyncReport};
use crate::adapters::{ActivityAdapter, SleepAdapter, StressAdapter, TrainingPeaks};
use crate::aggregate::aggregate_metrics;
use crate::db::Database;
use crate::error::AppError;
use serde::Deserialize;
use serde_json::Value;

/// Import request body. Either array may be omitted. Rows stay loose JSON
/// so one malformed row cannot reject the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingPeaksImport {
    #[serde(default)]
    pub workouts: Option<Vec<Value>>,
    #[serde(default)]
    pub metrics: Option<Vec<Value>>,
}

impl TrainingPeaksImport {
    /// True when there is nothing to import.
    pub fn is_empty(&self) -> bool {
        self.workouts.as_ref().map_or(true, Vec::is_empty)
            && self.metrics.as_ref().map_or(true, Vec::is_empty)
    }
}

pub async fn import_trainingpeaks(
    db: &Database,
    import: &TrainingPeaksImport,
) -> Result<SyncReport, AppError> {
    if import.is_empty() {
        return Err(AppError::BadRequest(
            "expected a non-empty 'workouts' or 'metrics' array".to_string(),
        ));
    }

    let workouts = import.workouts.as_deref().unwrap_or_default();
    let metrics = import.metrics.as_deref().unwrap_or_default();
    tracing::info!(
        workouts = workouts.len(),
        metrics = metrics.len(),
        "Starting TrainingPeaks import"
    );

    let mut report = SyncReport::new("trainingpeaks");

    for (index, raw) in workouts.iter().enumerate() {
        ingest(
            db,
            &mut report.activities,
            format!("workout row {}", index + 1),
            TrainingPeaks::activity(raw),
        )
        .await;
    }

    let aggregation = aggregate_metrics(metrics);
    if aggregation.undated_rows > 0 {
        tracing::warn!(
            rows = aggregation.undated_rows,
            "Dropped metric rows without a parseable date"
        );
    }

    for day in &aggregation.days {
        ingest(
            db,
            &mut report.sleep,
            format!("sleep {}", day.date),
            TrainingPeaks::sleep(day.date, day),
        )
        .await;
        ingest(
            db,
            &mut report.stress,
            format!("stress {}", day.date),
            TrainingPeaks::stress(day.date, day),
        )
        .await;
    }

    report.log_summary();
    Ok(report)
}
