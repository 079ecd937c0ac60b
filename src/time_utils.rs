// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar-day handling.

use chrono::{Days, NaiveDate};

/// Extract the calendar day from a provider timestamp.
///
/// Accepts "2024-01-05", "2024-01-05T07:30:00Z", "2024-01-05 07:30:00" and
/// the US-style "1/5/2024" some exports use.
pub fn parse_day(timestamp: &str) -> Option<NaiveDate> {
    let date_part = timestamp
        .trim()
        .split(['T', ' '])
        .next()
        .filter(|s| !s.is_empty())?;

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%m/%d/%Y"))
        .ok()
}

/// The `count` most recent days, newest first, starting with `today`.
pub fn recent_days(today: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..u64::from(count)).filter_map(move |offset| today.checked_sub_days(Days::new(offset)))
}
