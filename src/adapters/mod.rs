// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Provider adapters: raw provider records to canonical records.
//!
//! Each provider is a zero-sized type implementing the capabilities it
//! supports. Adapters are pure. `Ok(None)` means the record was
//! deliberately skipped (wrong activity type, no usable data); `Err` means
//! the record was malformed and is reported as a per-record failure.

pub mod garmin;
pub mod strava;
pub mod trainingpeaks;

use crate::models::{Activity, SleepRecord, StressRecord};
use chrono::NaiveDate;

pub use garmin::Garmin;
pub use strava::Strava;
pub use trainingpeaks::TrainingPeaks;

/// Outcome of mapping one raw record.
pub type Mapped<T> = Result<Option<T>, TransformError>;

/// A raw record that could not be mapped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid value for '{field}': {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Maps provider activities.
pub trait ActivityAdapter {
    type Raw: ?Sized;

    fn activity(raw: &Self::Raw) -> Mapped<Activity>;
}

/// Maps one day of provider sleep data.
pub trait SleepAdapter {
    type Raw: ?Sized;

    fn sleep(date: NaiveDate, raw: &Self::Raw) -> Mapped<SleepRecord>;
}

/// Maps one day of provider stress data.
pub trait StressAdapter {
    type Raw: ?Sized;

    fn stress(date: NaiveDate, raw: &Self::Raw) -> Mapped<StressRecord>;
}
