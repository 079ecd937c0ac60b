// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite connection pool, schema bootstrap and read queries.
//!
//! Tables:
//! - `activities` keyed by `id`
//! - `sleep` keyed by `date`
//! - `stress` keyed by `date`
//!
//! Each keeps the original provider payload in a JSON `raw_data` column.

use crate::error::AppError;
use crate::models::{Activity, ActivitySource, SleepRecord, StressRecord};
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;

const MAX_CONNECTIONS: u32 = 5;

/// Database handle. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and make sure the tables exist.
    ///
    /// In-memory databases use a single long-lived connection, since every
    /// SQLite connection to `:memory:` is a separate database.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!("Connected to database");
        Ok(db)
    }

    /// Get a reference to the pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the tables if they don't exist yet.
    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY,
                source TEXT NOT NULL,
                name TEXT NOT NULL,
                activity_type TEXT NOT NULL,
                date TEXT NOT NULL,
                distance REAL,
                duration INTEGER,
                pace TEXT,
                calories INTEGER,
                elevation INTEGER,
                avg_hr INTEGER,
                max_hr INTEGER,
                polyline TEXT,
                raw_data TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date DESC)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sleep (
                date TEXT PRIMARY KEY,
                total_sleep INTEGER,
                deep_sleep INTEGER,
                light_sleep INTEGER,
                rem_sleep INTEGER,
                awake INTEGER,
                score INTEGER,
                raw_data TEXT NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stress (
                date TEXT PRIMARY KEY,
                avg_stress INTEGER,
                max_stress INTEGER,
                raw_data TEXT NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ─── Activities ──────────────────────────────────────────────

    /// Most recent activities first, optionally for one source.
    pub async fn list_activities(
        &self,
        limit: u32,
        source: Option<ActivitySource>,
    ) -> Result<Vec<Activity>, AppError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            r#"
            SELECT id, source, name, activity_type, date, distance, duration, pace,
                   calories, elevation, avg_hr, max_hr, polyline, raw_data
            FROM activities
            WHERE (?1 IS NULL OR source = ?1)
            ORDER BY date DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(source.map(|s| s.as_str()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Activity::try_from).collect()
    }

    pub async fn get_activity(&self, id: i64) -> Result<Option<Activity>, AppError> {
        let row: Option<ActivityRow> = sqlx::query_as(
            r#"
            SELECT id, source, name, activity_type, date, distance, duration, pace,
                   calories, elevation, avg_hr, max_hr, polyline, raw_data
            FROM activities
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Activity::try_from).transpose()
    }

    // ─── Sleep ───────────────────────────────────────────────────

    /// Most recent days first.
    pub async fn list_sleep(&self, limit: u32) -> Result<Vec<SleepRecord>, AppError> {
        let rows: Vec<SleepRow> = sqlx::query_as(
            r#"
            SELECT date, total_sleep, deep_sleep, light_sleep, rem_sleep, awake, score, raw_data
            FROM sleep
            ORDER BY date DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SleepRecord::from).collect())
    }

    pub async fn get_sleep(&self, date: NaiveDate) -> Result<Option<SleepRecord>, AppError> {
        let row: Option<SleepRow> = sqlx::query_as(
            r#"
            SELECT date, total_sleep, deep_sleep, light_sleep, rem_sleep, awake, score, raw_data
            FROM sleep
            WHERE date = ?1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SleepRecord::from))
    }

    // ─── Stress ──────────────────────────────────────────────────

    /// Most recent days first.
    pub async fn list_stress(&self, limit: u32) -> Result<Vec<StressRecord>, AppError> {
        let rows: Vec<StressRow> = sqlx::query_as(
            r#"
            SELECT date, avg_stress, max_stress, raw_data
            FROM stress
            ORDER BY date DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StressRecord::from).collect())
    }

    pub async fn get_stress(&self, date: NaiveDate) -> Result<Option<StressRecord>, AppError> {
        let row: Option<StressRow> = sqlx::query_as(
            "SELECT date, avg_stress, max_stress, raw_data FROM stress WHERE date = ?1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StressRecord::from))
    }
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: i64,
    source: String,
    name: String,
    activity_type: String,
    date: NaiveDate,
    distance: Option<f64>,
    duration: Option<i64>,
    pace: Option<String>,
    calories: Option<i64>,
    elevation: Option<i64>,
    avg_hr: Option<i64>,
    max_hr: Option<i64>,
    polyline: Option<String>,
    raw_data: Json<serde_json::Value>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            id: row.id,
            source: row.source.parse().map_err(AppError::Database)?,
            name: row.name,
            activity_type: row.activity_type.parse().map_err(AppError::Database)?,
            date: row.date,
            distance: row.distance,
            duration: row.duration,
            pace: row.pace,
            calories: row.calories,
            elevation: row.elevation,
            avg_hr: row.avg_hr,
            max_hr: row.max_hr,
            polyline: row.polyline,
            raw_data: row.raw_data.0,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SleepRow {
    date: NaiveDate,
    total_sleep: Option<i64>,
    deep_sleep: Option<i64>,
    light_sleep: Option<i64>,
    rem_sleep: Option<i64>,
    awake: Option<i64>,
    score: Option<i64>,
    raw_data: Json<serde_json::Value>,
}

impl From<SleepRow> for SleepRecord {
    fn from(row: SleepRow) -> Self {
        SleepRecord {
            date: row.date,
            total_sleep: row.total_sleep,
            deep_sleep: row.deep_sleep,
            light_sleep: row.light_sleep,
            rem_sleep: row.rem_sleep,
            awake: row.awake,
            score: row.score,
            raw_data: row.raw_data.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StressRow {
    date: NaiveDate,
    avg_stress: Option<i64>,
    max_stress: Option<i64>,
    raw_data: Json<serde_json::Value>,
}

impl From<StressRow> for StressRecord {
    fn from(row: StressRow) -> Self {
        StressRecord {
            date: row.date,
            avg_stress: row.avg_stress,
            max_stress: row.max_stress,
            raw_data: row.raw_data.0,
        }
    }
}
