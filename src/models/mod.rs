// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod health;

pub use activity::{Activity, ActivitySource, ActivityType};
pub use health::{SleepRecord, StressRecord};
