// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TrainingPeaks workout export rows and aggregated daily metrics.
//!
//! Workout rows use the column names of the TrainingPeaks CSV export
//! (`WorkoutDay`, `WorkoutType`, `DistanceInMeters`, `TimeTotalInHours`, ...).
//! Values may be strings or numbers.

use super::{ActivityAdapter, Mapped, SleepAdapter, StressAdapter, TransformError};
use crate::aggregate::DailyMetrics;
use crate::models::{Activity, ActivitySource, ActivityType, SleepRecord, StressRecord};
use crate::normalize::{
    effective_velocity, format_pace, hours_to_seconds, int_field, kilojoules_to_kcal,
    number_field, str_field, to_kilometers,
};
use crate::synthetic_id::derive_id;
use crate::time_utils::parse_day;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

/// Heart-rate zone columns in the export.
const HR_ZONE_COUNT: usize = 10;

pub struct TrainingPeaks;

impl ActivityAdapter for TrainingPeaks {
    type Raw = Value;

    /// Rows with neither a distance nor a total time (planned-only
    /// workouts) are skipped.
    fn activity(raw: &Value) -> Mapped<Activity> {
        let meters = number_field(raw, "DistanceInMeters").filter(|d| *d > 0.0);
        let hours = number_field(raw, "TimeTotalInHours").filter(|h| *h > 0.0);
        if meters.is_none() && hours.is_none() {
            return Ok(None);
        }

        let day = str_field(raw, "WorkoutDay").ok_or(TransformError::MissingField("WorkoutDay"))?;
        let date = parse_day(day).ok_or_else(|| TransformError::InvalidDate(day.to_string()))?;

        let workout_type = str_field(raw, "WorkoutType");
        let activity_type = ActivityType::from_workout_type(workout_type);

        let id = derive_id(
            &date.format("%Y-%m-%d").to_string(),
            workout_type.unwrap_or_default(),
            meters,
        );

        let duration = hours_to_seconds(hours);
        let velocity = effective_velocity(
            number_field(raw, "VelocityAverage"),
            meters,
            duration.map(|s| s as f64),
        );

        Ok(Some(Activity {
            id,
            source: ActivitySource::TrainingPeaks,
            name: str_field(raw, "Title")
                .unwrap_or(activity_type.as_str())
                .to_string(),
            activity_type,
            date,
            distance: meters.map(to_kilometers),
            duration,
            pace: format_pace(velocity, activity_type.as_str()),
            calories: number_field(raw, "Energy").map(kilojoules_to_kcal),
            elevation: None,
            avg_hr: int_field(raw, "HeartRateAverage"),
            max_hr: int_field(raw, "HeartRateMax"),
            polyline: None,
            raw_data: workout_payload(raw),
        }))
    }
}

/// Raw payload for a workout: the original row plus the secondary metrics
/// that have no column of their own.
fn workout_payload(raw: &Value) -> Value {
    let mut zones = Map::new();
    for zone in 1..=HR_ZONE_COUNT {
        if let Some(minutes) = number_field(raw, &format!("HRZone{}Minutes", zone)) {
            zones.insert(zone.to_string(), json!(minutes));
        }
    }

    json!({
        "workout": raw,
        "metrics": {
            "power_avg": number_field(raw, "PowerAverage"),
            "power_max": number_field(raw, "PowerMax"),
            "cadence_avg": number_field(raw, "CadenceAverage"),
            "cadence_max": number_field(raw, "CadenceMax"),
            "tss": number_field(raw, "TSS"),
            "intensity_factor": number_field(raw, "IF"),
            "rpe": number_field(raw, "Rpe"),
            "feeling": number_field(raw, "Feeling"),
            "hr_zone_minutes": zones,
        }
    })
}

impl SleepAdapter for TrainingPeaks {
    type Raw = DailyMetrics;

    /// Emitted only when the day has a "Sleep Hours" value.
    fn sleep(date: NaiveDate, day: &DailyMetrics) -> Mapped<SleepRecord> {
        if day.sleep_hours.is_none() {
            return Ok(None);
        }

        Ok(Some(SleepRecord {
            date,
            total_sleep: hours_to_seconds(day.sleep_hours),
            deep_sleep: hours_to_seconds(day.deep_sleep_hours),
            light_sleep: hours_to_seconds(day.light_sleep_hours),
            rem_sleep: hours_to_seconds(day.rem_sleep_hours),
            awake: hours_to_seconds(day.awake_hours),
            score: None,
            raw_data: day_payload(day),
        }))
    }
}

impl StressAdapter for TrainingPeaks {
    type Raw = DailyMetrics;

    /// Emitted only when the day has a stress average.
    fn stress(date: NaiveDate, day: &DailyMetrics) -> Mapped<StressRecord> {
        let Some(avg) = day.stress_avg else {
            return Ok(None);
        };

        Ok(Some(StressRecord {
            date,
            avg_stress: Some(avg.round() as i64),
            max_stress: day.stress_max.map(|m| m.round() as i64),
            raw_data: day_payload(day),
        }))
    }
}

/// Raw payload for a day: the export rows it came from plus the folded
/// values.
fn day_payload(day: &DailyMetrics) -> Value {
    json!({
        "rows": day.rows,
        "metrics": day,
    })
}
