// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect activity, sleep and stress payloads.

use super::{ActivityAdapter, Mapped, SleepAdapter, StressAdapter, TransformError};
use crate::models::{Activity, ActivitySource, ActivityType, SleepRecord, StressRecord};
use crate::normalize::{
    effective_velocity, format_pace, id_field, int_field, number_field, str_field, to_kilometers,
    to_whole_seconds,
};
use crate::time_utils::parse_day;
use chrono::NaiveDate;
use serde_json::Value;

/// Only this Garmin activity type is imported.
const RUNNING_TYPE_KEY: &str = "running";

pub struct Garmin;

impl ActivityAdapter for Garmin {
    type Raw = Value;

    fn activity(raw: &Value) -> Mapped<Activity> {
        let type_key = raw
            .get("activityType")
            .and_then(|t| t.get("typeKey"))
            .and_then(Value::as_str);
        if type_key != Some(RUNNING_TYPE_KEY) {
            return Ok(None);
        }

        let id = id_field(raw, "activityId").ok_or(TransformError::MissingField("activityId"))?;

        let start = str_field(raw, "startTimeLocal")
            .or_else(|| str_field(raw, "startTimeGMT"))
            .ok_or(TransformError::MissingField("startTimeLocal"))?;
        let date = parse_day(start).ok_or_else(|| TransformError::InvalidDate(start.to_string()))?;

        let meters = number_field(raw, "distance").unwrap_or(0.0);
        let seconds = number_field(raw, "duration").unwrap_or(0.0);
        let velocity = effective_velocity(
            number_field(raw, "averageSpeed"),
            Some(meters),
            Some(seconds),
        );

        Ok(Some(Activity {
            id,
            source: ActivitySource::Garmin,
            name: str_field(raw, "activityName").unwrap_or("Run").to_string(),
            activity_type: ActivityType::Run,
            date,
            distance: Some(to_kilometers(meters)),
            duration: Some(to_whole_seconds(seconds)),
            pace: format_pace(velocity, ActivityType::Run.as_str()),
            calories: Some(int_field(raw, "calories").unwrap_or(0)),
            elevation: Some(int_field(raw, "elevationGain").unwrap_or(0)),
            avg_hr: Some(int_field(raw, "averageHR").unwrap_or(0)),
            max_hr: Some(int_field(raw, "maxHR").unwrap_or(0)),
            polyline: None,
            raw_data: raw.clone(),
        }))
    }
}

impl SleepAdapter for Garmin {
    type Raw = Value;

    /// A day without a `dailySleepDTO` (or with no recorded sleep) is skipped.
    fn sleep(date: NaiveDate, raw: &Value) -> Mapped<SleepRecord> {
        let Some(dto) = raw.get("dailySleepDTO").filter(|d| d.is_object()) else {
            return Ok(None);
        };

        let deep = int_field(dto, "deepSleepSeconds");
        let light = int_field(dto, "lightSleepSeconds");
        let rem = int_field(dto, "remSleepSeconds");
        let total = int_field(dto, "sleepTimeSeconds").or_else(|| match (deep, light, rem) {
            (Some(d), Some(l), Some(r)) => Some(d + l + r),
            _ => None,
        });

        if total.is_none() {
            return Ok(None);
        }

        let score = dto
            .get("sleepScores")
            .and_then(|s| s.get("overall"))
            .and_then(|o| int_field(o, "value"));

        Ok(Some(SleepRecord {
            date,
            total_sleep: total,
            deep_sleep: deep,
            light_sleep: light,
            rem_sleep: rem,
            awake: int_field(dto, "awakeSleepSeconds"),
            score,
            raw_data: raw.clone(),
        }))
    }
}

impl StressAdapter for Garmin {
    type Raw = Value;

    /// An empty payload is skipped.
    fn stress(date: NaiveDate, raw: &Value) -> Mapped<StressRecord> {
        let has_data = match raw {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => {
                return Err(TransformError::InvalidValue {
                    field: "stress",
                    value: raw.to_string(),
                })
            }
        };
        if !has_data {
            return Ok(None);
        }

        Ok(Some(StressRecord {
            date,
            avg_stress: int_field(raw, "avgStressLevel"),
            max_stress: int_field(raw, "maxStressLevel"),
            raw_data: raw.clone(),
        }))
    }
}
