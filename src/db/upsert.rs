// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Insert-or-update of canonical records.
//!
//! Every write replaces all non-key columns of the existing row, so
//! replaying a sync leaves the table unchanged. Activities keep their
//! original `source`, `date` and `created_at` and refresh `updated_at`.

use super::Database;
use crate::error::AppError;
use crate::models::{Activity, SleepRecord, StressRecord};
use async_trait::async_trait;
use sqlx::types::Json;

/// A record that can be written to the store by its identity key.
#[async_trait]
pub trait Upsert: Send + Sync {
    /// Identity key, for logs and error reports.
    fn key(&self) -> String;

    async fn upsert(&self, db: &Database) -> Result<(), AppError>;
}

#[async_trait]
impl Upsert for Activity {
    fn key(&self) -> String {
        format!("activity {}", self.id)
    }

    async fn upsert(&self, db: &Database) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO activities (
                id, source, name, activity_type, date, distance, duration, pace,
                calories, elevation, avg_hr, max_hr, polyline, raw_data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                activity_type = excluded.activity_type,
                distance = excluded.distance,
                duration = excluded.duration,
                pace = excluded.pace,
                calories = excluded.calories,
                elevation = excluded.elevation,
                avg_hr = excluded.avg_hr,
                max_hr = excluded.max_hr,
                polyline = excluded.polyline,
                raw_data = excluded.raw_data,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(self.id)
        .bind(self.source.as_str())
        .bind(&self.name)
        .bind(self.activity_type.as_str())
        .bind(self.date)
        .bind(self.distance)
        .bind(self.duration)
        .bind(&self.pace)
        .bind(self.calories)
        .bind(self.elevation)
        .bind(self.avg_hr)
        .bind(self.max_hr)
        .bind(&self.polyline)
        .bind(Json(&self.raw_data))
        .execute(db.pool())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Upsert for SleepRecord {
    fn key(&self) -> String {
        format!("sleep {}", self.date)
    }

    async fn upsert(&self, db: &Database) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sleep (
                date, total_sleep, deep_sleep, light_sleep, rem_sleep, awake, score, raw_data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT (date) DO UPDATE SET
                total_sleep = excluded.total_sleep,
                deep_sleep = excluded.deep_sleep,
                light_sleep = excluded.light_sleep,
                rem_sleep = excluded.rem_sleep,
                awake = excluded.awake,
                score = excluded.score,
                raw_data = excluded.raw_data
            "#,
        )
        .bind(self.date)
        .bind(self.total_sleep)
        .bind(self.deep_sleep)
        .bind(self.light_sleep)
        .bind(self.rem_sleep)
        .bind(self.awake)
        .bind(self.score)
        .bind(Json(&self.raw_data))
        .execute(db.pool())
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Upsert for StressRecord {
    fn key(&self) -> String {
        format!("stress {}", self.date)
    }

    async fn upsert(&self, db: &Database) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO stress (date, avg_stress, max_stress, raw_data)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (date) DO UPDATE SET
                avg_stress = excluded.avg_stress,
                max_stress = excluded.max_stress,
                raw_data = excluded.raw_data
            "#,
        )
        .bind(self.date)
        .bind(self.avg_stress)
        .bind(self.max_stress)
        .bind(Json(&self.raw_data))
        .execute(db.pool())
        .await?;

        Ok(())
    }
}
