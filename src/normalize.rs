// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit and value normalization.
//!
//! Providers report distance in meters, speed in m/s, energy in kilojoules
//! and durations as fractional seconds or hours. These helpers convert them
//! to the stored units. None of them fail: unusable input becomes `None`.

use serde_json::Value;

/// Meters to kilometers, rounded to 2 decimal places.
pub fn to_kilometers(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

/// Round a (possibly fractional) number of seconds to whole seconds.
pub fn to_whole_seconds(seconds: f64) -> i64 {
    seconds.round() as i64
}

/// Hours to whole seconds.
pub fn hours_to_seconds(hours: Option<f64>) -> Option<i64> {
    hours.map(|h| to_whole_seconds(h * 3600.0))
}

/// Seconds to hours with one decimal place, for display.
pub fn seconds_to_hours(seconds: Option<i64>) -> Option<f64> {
    seconds.map(|s| (s as f64 / 3600.0 * 10.0).round() / 10.0)
}

/// Format a pace from a velocity in m/s.
///
/// Runs and walks get "M:SS/km", everything else "X.X km/h".
pub fn format_pace(velocity: Option<f64>, activity_type: &str) -> Option<String> {
    let velocity = velocity.filter(|v| v.is_finite() && *v > 0.0)?;

    let kind = activity_type.to_ascii_lowercase();
    if kind == "run" || kind == "walk" {
        let secs_per_km = (1000.0 / velocity).round() as i64;
        Some(format!("{}:{:02}/km", secs_per_km / 60, secs_per_km % 60))
    } else {
        Some(format!("{:.1} km/h", velocity * 3.6))
    }
}

/// Velocity to use for pace: the reported average, or distance over time.
pub fn effective_velocity(
    average_speed: Option<f64>,
    distance_meters: Option<f64>,
    duration_secs: Option<f64>,
) -> Option<f64> {
    average_speed.filter(|v| *v > 0.0).or_else(|| match (distance_meters, duration_secs) {
        (Some(d), Some(t)) if d > 0.0 && t > 0.0 => Some(d / t),
        _ => None,
    })
}

/// Energy in kilojoules to kcal.
pub fn kilojoules_to_kcal(kj: f64) -> i64 {
    (kj / 4.184).round() as i64
}

/// Parse a loosely typed scalar as a number.
pub fn safe_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Parse a loosely typed scalar as an integer, rounding to nearest.
pub fn safe_int(value: &Value) -> Option<i64> {
    safe_number(value).map(|v| v.round() as i64)
}

/// Look up `key` in a JSON object and parse it with [`safe_number`].
pub fn number_field(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(safe_number)
}

/// Look up `key` in a JSON object and parse it with [`safe_int`].
pub fn int_field(raw: &Value, key: &str) -> Option<i64> {
    raw.get(key).and_then(safe_int)
}

/// Look up a provider ID. Integers are read exactly, without the `f64`
/// round trip of [`int_field`].
pub fn id_field(raw: &Value, key: &str) -> Option<i64> {
    let value = raw.get(key)?;
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        .or_else(|| safe_int(value))
}

/// Look up `key` in a JSON object as a non-empty string.
pub fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
