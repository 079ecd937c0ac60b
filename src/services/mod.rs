// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider API clients.

pub mod garmin;
pub mod strava;

pub use garmin::{GarminApi, GarminClient, GarminSession};
pub use strava::{StravaApi, StravaClient};
