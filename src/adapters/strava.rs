// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava summary activities.

use super::{ActivityAdapter, Mapped, TransformError};
use crate::models::{Activity, ActivitySource, ActivityType};
use crate::normalize::{
    effective_velocity, format_pace, id_field, int_field, number_field, str_field, to_kilometers,
    to_whole_seconds,
};
use crate::time_utils::parse_day;
use serde_json::Value;

/// Only this Strava activity type is imported.
const RUN_TYPE: &str = "Run";

pub struct Strava;

impl ActivityAdapter for Strava {
    type Raw = Value;

    fn activity(raw: &Value) -> Mapped<Activity> {
        if raw.get("type").and_then(Value::as_str) != Some(RUN_TYPE) {
            return Ok(None);
        }

        let id = id_field(raw, "id").ok_or(TransformError::MissingField("id"))?;

        let start = str_field(raw, "start_date_local")
            .or_else(|| str_field(raw, "start_date"))
            .ok_or(TransformError::MissingField("start_date_local"))?;
        let date = parse_day(start).ok_or_else(|| TransformError::InvalidDate(start.to_string()))?;

        let meters = number_field(raw, "distance").unwrap_or(0.0);
        let seconds = number_field(raw, "moving_time").unwrap_or(0.0);
        let velocity = effective_velocity(
            number_field(raw, "average_speed"),
            Some(meters),
            Some(seconds),
        );

        let polyline = raw
            .get("map")
            .and_then(|m| m.get("summary_polyline"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Some(Activity {
            id,
            source: ActivitySource::Strava,
            name: str_field(raw, "name").unwrap_or("Run").to_string(),
            activity_type: ActivityType::Run,
            date,
            distance: Some(to_kilometers(meters)),
            duration: Some(to_whole_seconds(seconds)),
            pace: format_pace(velocity, ActivityType::Run.as_str()),
            calories: Some(
                number_field(raw, "kilojoules")
                    .map(|kj| kj.round() as i64)
                    .unwrap_or(0),
            ),
            elevation: Some(int_field(raw, "total_elevation_gain").unwrap_or(0)),
            avg_hr: Some(int_field(raw, "average_heartrate").unwrap_or(0)),
            max_hr: Some(int_field(raw, "max_heartrate").unwrap_or(0)),
            polyline: Some(polyline),
            raw_data: raw.clone(),
        }))
    }
}
