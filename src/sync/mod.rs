// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestration: fetch provider records, map them through the
//! adapters and upsert the results.
//!
//! Each sync runs sequentially, one record at a time. A record that fails
//! to map or write is logged into its category's tally and the sync moves
//! on. Only authentication and the initial fetch are fatal.

pub mod garmin;
pub mod strava;
pub mod trainingpeaks;

use crate::adapters::Mapped;
use crate::db::{Database, Upsert};
use serde::Serialize;
use std::fmt::Display;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub use garmin::sync_garmin;
pub use strava::sync_strava;
pub use trainingpeaks::{import_trainingpeaks, TrainingPeaksImport};

/// Outcome counters for one record category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryTally {
    /// Records upserted
    pub written: usize,
    /// Records deliberately not imported (filtered type, no data)
    pub skipped: usize,
    /// One entry per failed record
    pub errors: Vec<String>,
}

impl CategoryTally {
    pub fn record_error(&mut self, key: impl Display, error: impl Display) {
        let entry = format!("{}: {}", key, error);
        tracing::warn!(error = %entry, "Record failed");
        self.errors.push(entry);
    }
}

/// Summary returned by every sync and import.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncReport {
    pub provider: String,
    pub activities: CategoryTally,
    pub sleep: CategoryTally,
    pub stress: CategoryTally,
}

impl SyncReport {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            activities: CategoryTally::default(),
            sleep: CategoryTally::default(),
            stress: CategoryTally::default(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.activities.errors.len() + self.sleep.errors.len() + self.stress.errors.len()
    }

    fn log_summary(&self) {
        tracing::info!(
            provider = %self.provider,
            activities = self.activities.written,
            activities_skipped = self.activities.skipped,
            sleep = self.sleep.written,
            stress = self.stress.written,
            errors = self.error_count(),
            "Sync complete"
        );
    }
}

/// Write one mapped record and count the outcome. `label` names the raw
/// record when mapping failed before it had a key.
async fn ingest<T: Upsert>(
    db: &Database,
    tally: &mut CategoryTally,
    label: impl Display,
    mapped: Mapped<T>,
) {
    match mapped {
        Ok(Some(record)) => match record.upsert(db).await {
            Ok(()) => tally.written += 1,
            Err(e) => tally.record_error(record.key(), e),
        },
        Ok(None) => tally.skipped += 1,
        Err(e) => tally.record_error(label, e),
    }
}
