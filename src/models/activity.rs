// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Canonical activity model shared by every provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Provider an activity was imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivitySource {
    Garmin,
    Strava,
    TrainingPeaks,
}

impl ActivitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivitySource::Garmin => "garmin",
            ActivitySource::Strava => "strava",
            ActivitySource::TrainingPeaks => "trainingpeaks",
        }
    }
}

impl fmt::Display for ActivitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivitySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "garmin" => Ok(ActivitySource::Garmin),
            "strava" => Ok(ActivitySource::Strava),
            "trainingpeaks" => Ok(ActivitySource::TrainingPeaks),
            other => Err(format!("unknown activity source '{}'", other)),
        }
    }
}

/// Canonical activity vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityType {
    Run,
    Ride,
    Walk,
    Swim,
    Workout,
}

/// TrainingPeaks workout type (lowercase) to canonical type.
const WORKOUT_TYPES: &[(&str, ActivityType)] = &[
    ("run", ActivityType::Run),
    ("bike", ActivityType::Ride),
    ("walk", ActivityType::Walk),
    ("mtb", ActivityType::Ride),
    ("strength", ActivityType::Workout),
    ("other", ActivityType::Workout),
    ("swim", ActivityType::Swim),
];

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Run => "Run",
            ActivityType::Ride => "Ride",
            ActivityType::Walk => "Walk",
            ActivityType::Swim => "Swim",
            ActivityType::Workout => "Workout",
        }
    }

    /// Map a free-text TrainingPeaks workout type. Unknown or missing types
    /// become `Workout`.
    pub fn from_workout_type(raw: Option<&str>) -> Self {
        let key = raw.map(|s| s.trim().to_ascii_lowercase()).unwrap_or_default();
        WORKOUT_TYPES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, ty)| *ty)
            .unwrap_or(ActivityType::Workout)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Run" => Ok(ActivityType::Run),
            "Ride" => Ok(ActivityType::Ride),
            "Walk" => Ok(ActivityType::Walk),
            "Swim" => Ok(ActivityType::Swim),
            "Workout" => Ok(ActivityType::Workout),
            other => Err(format!("unknown activity type '{}'", other)),
        }
    }
}

/// Stored activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Provider activity ID, or a synthetic ID for TrainingPeaks rows
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub source: ActivitySource,
    pub name: String,
    pub activity_type: ActivityType,
    /// Calendar day of the activity (local time)
    pub date: NaiveDate,
    /// Distance in kilometers, 2 decimal places
    pub distance: Option<f64>,
    /// Duration in whole seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub duration: Option<i64>,
    /// "M:SS/km" for runs and walks, "X.X km/h" otherwise
    pub pace: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub calories: Option<i64>,
    /// Elevation gain in meters
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub elevation: Option<i64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub avg_hr: Option<i64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub max_hr: Option<i64>,
    /// Encoded route polyline (opaque)
    pub polyline: Option<String>,
    /// Original provider payload, kept for fields without a column
    pub raw_data: serde_json::Value,
}
