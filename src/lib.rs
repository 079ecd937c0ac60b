// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness Hub: a personal fitness data hub.
//!
//! Pulls runs, sleep and stress from Garmin Connect and Strava, accepts
//! TrainingPeaks exports, normalizes everything into one canonical schema
//! and serves it back to a dashboard.

pub mod adapters;
pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod services;
pub mod sync;
pub mod synthetic_id;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{GarminApi, StravaApi};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub garmin: Arc<dyn GarminApi>,
    pub strava: Arc<dyn StravaApi>,
}
