// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::NaiveDate;
use fitness_hub::config::{Config, GarminCredentials, StravaCredentials};
use fitness_hub::db::Database;
use fitness_hub::error::AppError;
use fitness_hub::routes::create_router;
use fitness_hub::services::{GarminApi, GarminSession, StravaApi};
use fitness_hub::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory Garmin Connect.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeGarmin {
    pub fail_login: bool,
    pub fail_activities: bool,
    pub activities: Vec<Value>,
    pub sleep: HashMap<NaiveDate, Value>,
    pub stress: HashMap<NaiveDate, Value>,
    /// Days whose sleep and stress fetches fail
    pub failing_days: Vec<NaiveDate>,
}

#[async_trait]
impl GarminApi for FakeGarmin {
    async fn login(&self, _credentials: &GarminCredentials) -> Result<GarminSession, AppError> {
        if self.fail_login {
            return Err(AppError::provider_auth("Garmin", "invalid credentials"));
        }
        Ok(GarminSession {
            access_token: "fake-token".to_string(),
            display_name: "runner".to_string(),
        })
    }

    async fn activities(
        &self,
        _session: &GarminSession,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Value>, AppError> {
        if self.fail_activities {
            return Err(AppError::provider_api("Garmin", "HTTP 500"));
        }
        Ok(self
            .activities
            .iter()
            .skip(start as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn sleep(
        &self,
        _session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError> {
        if self.failing_days.contains(&date) {
            return Err(AppError::provider_api("Garmin", "HTTP 503"));
        }
        Ok(self.sleep.get(&date).cloned())
    }

    async fn stress(
        &self,
        _session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError> {
        if self.failing_days.contains(&date) {
            return Err(AppError::provider_api("Garmin", "HTTP 503"));
        }
        Ok(self.stress.get(&date).cloned())
    }
}

/// In-memory Strava. `pages[0]` is page 1.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeStrava {
    pub fail_refresh: bool,
    pub pages: Vec<Vec<Value>>,
    /// Page number (1-based) that fails
    pub failing_page: Option<u32>,
    pub requested_pages: Mutex<Vec<u32>>,
}

#[async_trait]
impl StravaApi for FakeStrava {
    async fn refresh_token(&self, _credentials: &StravaCredentials) -> Result<String, AppError> {
        if self.fail_refresh {
            return Err(AppError::provider_auth("Strava", "token invalid or expired"));
        }
        Ok("fake-access-token".to_string())
    }

    async fn list_activities(
        &self,
        _access_token: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>, AppError> {
        self.requested_pages.lock().unwrap().push(page);
        if self.failing_page == Some(page) {
            return Err(AppError::provider_api("Strava", "HTTP 500"));
        }
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}

/// Fresh in-memory database.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

/// Create a test app with fake providers and an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(
        Config::test_default(),
        FakeGarmin::default(),
        FakeStrava::default(),
    )
    .await
}

#[allow(dead_code)]
pub async fn create_test_app_with(
    config: Config,
    garmin: FakeGarmin,
    strava: FakeStrava,
) -> (axum::Router, Arc<AppState>) {
    let db = test_db().await;

    let state = Arc::new(AppState {
        config,
        db,
        garmin: Arc::new(garmin),
        strava: Arc::new(strava),
    });

    (create_router(state.clone()), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).expect("response body is JSON")
}

/// A Garmin running activity as returned by the activity list.
#[allow(dead_code)]
pub fn garmin_run(id: i64, start: &str) -> Value {
    json!({
        "activityId": id,
        "activityName": format!("Run {}", id),
        "activityType": {"typeKey": "running"},
        "startTimeLocal": start,
        "distance": 5000.0,
        "duration": 1500.4,
        "averageSpeed": 3.333,
        "calories": 320,
        "elevationGain": 42.0,
        "averageHR": 150,
        "maxHR": 171
    })
}

/// A Strava run as returned by the athlete activity list.
#[allow(dead_code)]
pub fn strava_run(id: i64, start: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Strava Run {}", id),
        "type": "Run",
        "start_date_local": start,
        "distance": 10000.0,
        "moving_time": 3000,
        "average_speed": 3.333,
        "kilojoules": 612.4,
        "total_elevation_gain": 80.0,
        "average_heartrate": 152.3,
        "max_heartrate": 176.0,
        "map": {"summary_polyline": "abc~def"}
    })
}

#[allow(dead_code)]
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
