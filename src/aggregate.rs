// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TrainingPeaks metrics aggregation.
//!
//! The metrics export is one row per (day, metric type). Rows are grouped by
//! calendar day and folded into a [`DailyMetrics`] using the `METRIC_FIELDS`
//! dispatch table. A value is either a scalar ("7.5") or a composite
//! ("Min:40/Max:85/Avg:62").
//!
//! Rows arrive as loose JSON. A row whose timestamp is missing, not a
//! string or not a date is counted and dropped, never rejected.

use crate::normalize::{safe_number, str_field};
use crate::time_utils::parse_day;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

static NULL: Value = Value::Null;

/// View of one row of the metrics export. Both the export's column names
/// (`Timestamp`, `Type`, `Value`) and lowercase keys are accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRow<'a> {
    pub timestamp: Option<&'a str>,
    pub metric_type: Option<&'a str>,
    pub value: &'a Value,
}

impl<'a> MetricRow<'a> {
    pub fn from_value(raw: &'a Value) -> Self {
        Self {
            timestamp: str_field(raw, "Timestamp").or_else(|| str_field(raw, "timestamp")),
            metric_type: str_field(raw, "Type").or_else(|| str_field(raw, "type")),
            value: raw.get("Value").or_else(|| raw.get("value")).unwrap_or(&NULL),
        }
    }
}

/// Parsed metric value. A scalar is reported as `avg`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValue {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

/// Parse a scalar or "min:X/max:Y/avg:Z" value. Keys are case-insensitive
/// and absent components are `None`.
pub fn parse_metric_value(value: &Value) -> MetricValue {
    let composite = value
        .as_str()
        .filter(|s| s.contains('/') && s.contains(':'));

    let Some(composite) = composite else {
        return MetricValue {
            avg: safe_number(value),
            ..MetricValue::default()
        };
    };

    let mut parsed = MetricValue::default();
    for part in composite.split('/') {
        let Some((key, raw)) = part.split_once(':') else {
            continue;
        };
        let number = safe_number(&Value::String(raw.to_string()));
        match key.trim().to_ascii_lowercase().as_str() {
            "min" => parsed.min = number,
            "max" => parsed.max = number,
            "avg" => parsed.avg = number,
            _ => {}
        }
    }
    parsed
}

/// Destination of a metric type within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricField {
    SleepHours,
    DeepSleepHours,
    LightSleepHours,
    RemSleepHours,
    AwakeHours,
    Hrv,
    RestingHr,
    Stress,
    BodyBattery,
    WeightKg,
}

/// Metric type name in the export to field.
const METRIC_FIELDS: &[(&str, MetricField)] = &[
    ("Sleep Hours", MetricField::SleepHours),
    ("Time In Deep Sleep", MetricField::DeepSleepHours),
    ("Time In Light Sleep", MetricField::LightSleepHours),
    ("Time In REM Sleep", MetricField::RemSleepHours),
    ("Time Awake", MetricField::AwakeHours),
    ("HRV", MetricField::Hrv),
    ("Pulse", MetricField::RestingHr),
    ("Stress Level", MetricField::Stress),
    ("Body Battery", MetricField::BodyBattery),
    ("Weight Kilograms", MetricField::WeightKg),
];

fn lookup_field(metric_type: &str) -> Option<MetricField> {
    let metric_type = metric_type.trim();
    METRIC_FIELDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(metric_type))
        .map(|(_, field)| *field)
}

/// Everything known about one day. Sleep durations are in hours here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetrics {
    /// Export rows that fell on this day, as received
    #[serde(skip)]
    pub rows: Vec<Value>,
    pub date: NaiveDate,
    pub sleep_hours: Option<f64>,
    pub deep_sleep_hours: Option<f64>,
    pub light_sleep_hours: Option<f64>,
    pub rem_sleep_hours: Option<f64>,
    pub awake_hours: Option<f64>,
    pub hrv: Option<f64>,
    pub resting_hr: Option<f64>,
    pub stress_avg: Option<f64>,
    pub stress_max: Option<f64>,
    pub body_battery_min: Option<f64>,
    pub body_battery_max: Option<f64>,
    pub weight: Option<f64>,
}

impl DailyMetrics {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            rows: Vec::new(),
            date,
            sleep_hours: None,
            deep_sleep_hours: None,
            light_sleep_hours: None,
            rem_sleep_hours: None,
            awake_hours: None,
            hrv: None,
            resting_hr: None,
            stress_avg: None,
            stress_max: None,
            body_battery_min: None,
            body_battery_max: None,
            weight: None,
        }
    }

    /// Fold one row into the day. Later rows win, but never erase a value
    /// with an absent one.
    fn apply(&mut self, field: MetricField, value: MetricValue) {
        fn set(slot: &mut Option<f64>, value: Option<f64>) {
            if value.is_some() {
                *slot = value;
            }
        }

        match field {
            MetricField::SleepHours => set(&mut self.sleep_hours, value.avg),
            MetricField::DeepSleepHours => set(&mut self.deep_sleep_hours, value.avg),
            MetricField::LightSleepHours => set(&mut self.light_sleep_hours, value.avg),
            MetricField::RemSleepHours => set(&mut self.rem_sleep_hours, value.avg),
            MetricField::AwakeHours => set(&mut self.awake_hours, value.avg),
            MetricField::Hrv => set(&mut self.hrv, value.avg),
            MetricField::RestingHr => set(&mut self.resting_hr, value.avg),
            MetricField::Stress => {
                set(&mut self.stress_avg, value.avg);
                set(&mut self.stress_max, value.max);
            }
            MetricField::BodyBattery => {
                set(&mut self.body_battery_min, value.min);
                set(&mut self.body_battery_max, value.max);
            }
            MetricField::WeightKg => set(&mut self.weight, value.avg),
        }
    }
}

/// Result of aggregating a metrics export.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One entry per day, oldest first
    pub days: Vec<DailyMetrics>,
    /// Rows dropped for lacking a parseable date
    pub undated_rows: usize,
}

/// Group rows by calendar day and fold each day.
pub fn aggregate_metrics(rows: &[Value]) -> Aggregation {
    let mut by_day: BTreeMap<NaiveDate, DailyMetrics> = BTreeMap::new();
    let mut undated_rows = 0;

    for raw in rows {
        let row = MetricRow::from_value(raw);
        let Some(date) = row.timestamp.and_then(parse_day) else {
            undated_rows += 1;
            continue;
        };

        let day = by_day.entry(date).or_insert_with(|| DailyMetrics::new(date));
        day.rows.push(raw.clone());

        let Some(field) = row.metric_type.and_then(lookup_field) else {
            continue;
        };
        day.apply(field, parse_metric_value(row.value));
    }

    Aggregation {
        days: by_day.into_values().collect(),
        undated_rows,
    }
}
