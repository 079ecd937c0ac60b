// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestration tests against fake providers and an in-memory store.

use fitness_hub::config::{Config, SyncSettings};
use fitness_hub::error::AppError;
use fitness_hub::models::{ActivitySource, ActivityType};
use fitness_hub::sync::{import_trainingpeaks, sync_garmin, sync_strava, TrainingPeaksImport};
use serde_json::{json, Value};

mod common;
use common::{day, garmin_run, strava_run, test_db, FakeGarmin, FakeStrava};

fn settings(health_days: u32, page_size: u32) -> SyncSettings {
    SyncSettings {
        garmin_activity_limit: 100,
        garmin_health_days: health_days,
        strava_page_size: page_size,
    }
}

// ─── Garmin ──────────────────────────────────────────────────

#[tokio::test]
async fn test_garmin_bad_activity_does_not_abort_the_rest() {
    let db = test_db().await;
    let config = Config::test_default();

    let mut activities: Vec<_> = (1..=9)
        .map(|i| garmin_run(i, &format!("2024-01-{:02} 07:00:00", i)))
        .collect();
    // Running activity without any start time
    activities.insert(
        4,
        json!({"activityId": 99, "activityType": {"typeKey": "running"}}),
    );

    let garmin = FakeGarmin {
        activities,
        ..FakeGarmin::default()
    };

    let report = sync_garmin(
        &garmin,
        &db,
        config.garmin.as_ref().unwrap(),
        &settings(0, 200),
        day(2024, 1, 10),
    )
    .await
    .unwrap();

    assert_eq!(report.activities.written, 9);
    assert_eq!(report.activities.errors.len(), 1);
    assert!(report.activities.errors[0].contains("activity 99"));
    assert_eq!(db.list_activities(100, None).await.unwrap().len(), 9);
    assert!(db.get_activity(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_garmin_non_running_activities_are_skipped() {
    let db = test_db().await;
    let config = Config::test_default();

    let mut ride = garmin_run(2, "2024-01-02 07:00:00");
    ride["activityType"]["typeKey"] = json!("cycling");

    let garmin = FakeGarmin {
        activities: vec![garmin_run(1, "2024-01-01 07:00:00"), ride],
        ..FakeGarmin::default()
    };

    let report = sync_garmin(
        &garmin,
        &db,
        config.garmin.as_ref().unwrap(),
        &settings(0, 200),
        day(2024, 1, 10),
    )
    .await
    .unwrap();

    assert_eq!(report.activities.written, 1);
    assert_eq!(report.activities.skipped, 1);
    assert!(report.activities.errors.is_empty());
}

#[tokio::test]
async fn test_garmin_health_days_tally_independently() {
    let db = test_db().await;
    let config = Config::test_default();

    let mut garmin = FakeGarmin {
        failing_days: vec![day(2024, 1, 9)],
        ..FakeGarmin::default()
    };
    garmin.sleep.insert(
        day(2024, 1, 10),
        json!({
            "dailySleepDTO": {
                "sleepTimeSeconds": 27000,
                "deepSleepSeconds": 5400,
                "lightSleepSeconds": 15000,
                "remSleepSeconds": 6600,
                "awakeSleepSeconds": 600,
                "sleepScores": {"overall": {"value": 82}}
            }
        }),
    );
    garmin.stress.insert(
        day(2024, 1, 10),
        json!({"avgStressLevel": 30, "maxStressLevel": 90}),
    );
    garmin.stress.insert(day(2024, 1, 8), json!({}));

    let report = sync_garmin(
        &garmin,
        &db,
        config.garmin.as_ref().unwrap(),
        &settings(3, 200),
        day(2024, 1, 10),
    )
    .await
    .unwrap();

    assert_eq!(report.sleep.written, 1);
    assert_eq!(report.sleep.skipped, 1);
    assert_eq!(report.sleep.errors.len(), 1);
    assert!(report.sleep.errors[0].contains("2024-01-09"));

    assert_eq!(report.stress.written, 1);
    assert_eq!(report.stress.skipped, 1);
    assert_eq!(report.stress.errors.len(), 1);

    let sleep = db.get_sleep(day(2024, 1, 10)).await.unwrap().unwrap();
    assert_eq!(sleep.total_sleep, Some(27000));
    assert_eq!(sleep.score, Some(82));

    let stress = db.get_stress(day(2024, 1, 10)).await.unwrap().unwrap();
    assert_eq!(stress.avg_stress, Some(30));
    assert_eq!(stress.max_stress, Some(90));
}

#[tokio::test]
async fn test_garmin_login_failure_is_fatal() {
    let db = test_db().await;
    let config = Config::test_default();

    let garmin = FakeGarmin {
        fail_login: true,
        activities: vec![garmin_run(1, "2024-01-01 07:00:00")],
        ..FakeGarmin::default()
    };

    let err = sync_garmin(
        &garmin,
        &db,
        config.garmin.as_ref().unwrap(),
        &settings(14, 200),
        day(2024, 1, 10),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ProviderAuth { .. }));
    assert!(db.list_activities(10, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_garmin_activity_fetch_failure_is_fatal() {
    let db = test_db().await;
    let config = Config::test_default();

    let garmin = FakeGarmin {
        fail_activities: true,
        ..FakeGarmin::default()
    };

    let err = sync_garmin(
        &garmin,
        &db,
        config.garmin.as_ref().unwrap(),
        &settings(14, 200),
        day(2024, 1, 10),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ProviderApi { .. }));
}

#[tokio::test]
async fn test_garmin_resync_is_idempotent() {
    let db = test_db().await;
    let config = Config::test_default();

    let garmin = FakeGarmin {
        activities: vec![
            garmin_run(1, "2024-01-01 07:00:00"),
            garmin_run(2, "2024-01-02 07:00:00"),
        ],
        ..FakeGarmin::default()
    };
    let credentials = config.garmin.as_ref().unwrap();

    sync_garmin(&garmin, &db, credentials, &settings(0, 200), day(2024, 1, 10))
        .await
        .unwrap();
    let first = db.list_activities(10, None).await.unwrap();

    let report = sync_garmin(&garmin, &db, credentials, &settings(0, 200), day(2024, 1, 10))
        .await
        .unwrap();
    let second = db.list_activities(10, None).await.unwrap();

    assert_eq!(report.activities.written, 2);
    assert_eq!(first, second);
}

// ─── Strava ──────────────────────────────────────────────────

#[tokio::test]
async fn test_strava_paginates_until_short_page() {
    let db = test_db().await;
    let config = Config::test_default();

    let strava = FakeStrava {
        pages: vec![
            vec![strava_run(1, "2024-01-01T07:00:00Z"), strava_run(2, "2024-01-02T07:00:00Z")],
            vec![strava_run(3, "2024-01-03T07:00:00Z"), strava_run(4, "2024-01-04T07:00:00Z")],
            vec![strava_run(5, "2024-01-05T07:00:00Z")],
            vec![strava_run(6, "2024-01-06T07:00:00Z")],
        ],
        ..FakeStrava::default()
    };

    let report = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 2))
        .await
        .unwrap();

    assert_eq!(report.provider, "strava");
    assert_eq!(report.activities.written, 5);
    assert_eq!(*strava.requested_pages.lock().unwrap(), vec![1, 2, 3]);

    let stored = db.get_activity(5).await.unwrap().unwrap();
    assert_eq!(stored.source, ActivitySource::Strava);
    assert_eq!(stored.calories, Some(612));
    assert_eq!(stored.polyline.as_deref(), Some("abc~def"));
}

#[tokio::test]
async fn test_strava_stops_on_empty_page() {
    let db = test_db().await;
    let config = Config::test_default();

    let strava = FakeStrava {
        pages: vec![vec![strava_run(1, "2024-01-01T07:00:00Z")]],
        ..FakeStrava::default()
    };

    let report = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 1))
        .await
        .unwrap();

    assert_eq!(report.activities.written, 1);
    assert_eq!(*strava.requested_pages.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn test_strava_skips_non_runs() {
    let db = test_db().await;
    let config = Config::test_default();

    let mut ride = strava_run(2, "2024-01-02T07:00:00Z");
    ride["type"] = json!("Ride");

    let strava = FakeStrava {
        pages: vec![vec![strava_run(1, "2024-01-01T07:00:00Z"), ride]],
        ..FakeStrava::default()
    };

    let report = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 200))
        .await
        .unwrap();

    assert_eq!(report.activities.written, 1);
    assert_eq!(report.activities.skipped, 1);
}

#[tokio::test]
async fn test_strava_later_page_failure_keeps_earlier_pages() {
    let db = test_db().await;
    let config = Config::test_default();

    let strava = FakeStrava {
        pages: vec![vec![strava_run(1, "2024-01-01T07:00:00Z"), strava_run(2, "2024-01-02T07:00:00Z")]],
        failing_page: Some(2),
        ..FakeStrava::default()
    };

    let report = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 2))
        .await
        .unwrap();

    assert_eq!(report.activities.written, 2);
    assert_eq!(report.activities.errors.len(), 1);
    assert!(report.activities.errors[0].starts_with("page 2"));
}

#[tokio::test]
async fn test_strava_first_page_failure_is_fatal() {
    let db = test_db().await;
    let config = Config::test_default();

    let strava = FakeStrava {
        failing_page: Some(1),
        ..FakeStrava::default()
    };

    let result = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 200)).await;
    assert!(matches!(result, Err(AppError::ProviderApi { .. })));
}

#[tokio::test]
async fn test_strava_refresh_failure_is_fatal() {
    let db = test_db().await;
    let config = Config::test_default();

    let strava = FakeStrava {
        fail_refresh: true,
        pages: vec![vec![strava_run(1, "2024-01-01T07:00:00Z")]],
        ..FakeStrava::default()
    };

    let result = sync_strava(&strava, &db, config.strava.as_ref().unwrap(), &settings(14, 200)).await;
    assert!(matches!(result, Err(AppError::ProviderAuth { .. })));
    assert!(strava.requested_pages.lock().unwrap().is_empty());
}

// ─── TrainingPeaks ───────────────────────────────────────────

fn metric(timestamp: &str, metric_type: &str, value: &str) -> Value {
    json!({"Timestamp": timestamp, "Type": metric_type, "Value": value})
}

#[tokio::test]
async fn test_trainingpeaks_sleep_without_stress() {
    let db = test_db().await;

    let import = TrainingPeaksImport {
        workouts: None,
        metrics: Some(vec![
            metric("2024-01-05 00:00:00", "Sleep Hours", "7.5"),
            metric("2024-01-05 00:00:00", "HRV", "58"),
            metric("2024-01-06 00:00:00", "Stress Level", "Min:5/Max:80/Avg:28"),
        ]),
    };

    let report = import_trainingpeaks(&db, &import).await.unwrap();

    assert_eq!(report.sleep.written, 1);
    assert_eq!(report.sleep.skipped, 1);
    assert_eq!(report.stress.written, 1);
    assert_eq!(report.stress.skipped, 1);

    let sleep = db.get_sleep(day(2024, 1, 5)).await.unwrap().unwrap();
    assert_eq!(sleep.total_sleep, Some(27000));
    assert!(db.get_stress(day(2024, 1, 5)).await.unwrap().is_none());

    let stress = db.get_stress(day(2024, 1, 6)).await.unwrap().unwrap();
    assert_eq!(stress.avg_stress, Some(28));
    assert_eq!(stress.max_stress, Some(80));
    assert!(db.get_sleep(day(2024, 1, 6)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_trainingpeaks_malformed_metric_rows_are_dropped() {
    let db = test_db().await;

    let import = TrainingPeaksImport {
        workouts: None,
        metrics: Some(vec![
            metric("2024-01-05 00:00:00", "Sleep Hours", "7.5"),
            json!({"Timestamp": 20240106, "Type": "Sleep Hours", "Value": "8"}),
            json!(["2024-01-06", "Sleep Hours", "8"]),
            json!({"Timestamp": "2024-01-05", "Type": 3, "Value": "1"}),
        ]),
    };

    let report = import_trainingpeaks(&db, &import).await.unwrap();
    assert_eq!(report.sleep.written, 1);
    assert_eq!(report.error_count(), 0);

    let sleep = db.get_sleep(day(2024, 1, 5)).await.unwrap().unwrap();
    assert_eq!(sleep.total_sleep, Some(27000));
    assert_eq!(sleep.raw_data["rows"].as_array().unwrap().len(), 2);
    assert!(db.get_sleep(day(2024, 1, 6)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_trainingpeaks_workouts_reimport_same_ids() {
    let db = test_db().await;

    let import = TrainingPeaksImport {
        workouts: Some(vec![
            json!({
                "Title": "Easy Run",
                "WorkoutType": "Run",
                "WorkoutDay": "2024-01-05",
                "DistanceInMeters": "8000",
                "TimeTotalInHours": "0.75"
            }),
            json!({
                "Title": "Yoga",
                "WorkoutType": "yoga",
                "WorkoutDay": "2024-01-05",
                "TimeTotalInHours": "1"
            }),
            json!({"Title": "Planned", "WorkoutType": "Run", "WorkoutDay": "2024-01-06"}),
        ]),
        metrics: None,
    };

    let first = import_trainingpeaks(&db, &import).await.unwrap();
    let second = import_trainingpeaks(&db, &import).await.unwrap();

    assert_eq!(first.activities.written, 2);
    assert_eq!(first.activities.skipped, 1);
    assert_eq!(second.activities.written, 2);

    let stored = db
        .list_activities(10, Some(ActivitySource::TrainingPeaks))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored
        .iter()
        .any(|a| a.activity_type == ActivityType::Workout && a.name == "Yoga"));
}

#[tokio::test]
async fn test_trainingpeaks_bad_row_is_reported() {
    let db = test_db().await;

    let import = TrainingPeaksImport {
        workouts: Some(vec![
            json!({"WorkoutType": "Run", "WorkoutDay": "not a day", "DistanceInMeters": "5000"}),
            json!({"WorkoutType": "Run", "WorkoutDay": "2024-01-05", "DistanceInMeters": "5000"}),
        ]),
        metrics: None,
    };

    let report = import_trainingpeaks(&db, &import).await.unwrap();
    assert_eq!(report.activities.written, 1);
    assert_eq!(report.activities.errors.len(), 1);
    assert!(report.activities.errors[0].starts_with("workout row 1"));
}

#[tokio::test]
async fn test_trainingpeaks_empty_import_is_rejected() {
    let db = test_db().await;

    let result = import_trainingpeaks(&db, &TrainingPeaksImport::default()).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
