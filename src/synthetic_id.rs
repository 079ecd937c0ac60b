// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stable identifiers for imported rows that have no provider ID.
//!
//! The ID is a truncated SHA-256 of `tp_{date}_{type}_{distance}`. 15 hex
//! digits (60 bits) always fit in the signed 64-bit `activities.id` column.
//! Truncation means collisions are possible but not expected at personal
//! training-log volumes.

use sha2::{Digest, Sha256};

/// Number of hex digits of the digest kept.
const ID_HEX_DIGITS: usize = 15;

/// Derive a deterministic activity ID from date, workout type and distance.
///
/// A missing distance is encoded as `0`, so a time-only row and a row with
/// an explicit zero distance share an ID.
pub fn derive_id(date: &str, workout_type: &str, distance_meters: Option<f64>) -> i64 {
    let composite = format!(
        "tp_{}_{}_{}",
        date,
        workout_type,
        distance_meters.unwrap_or(0.0)
    );
    let digest = hex::encode(Sha256::digest(composite.as_bytes()));

    // 15 hex digits never exceed i64::MAX, so the parse cannot fail.
    i64::from_str_radix(&digest[..ID_HEX_DIGITS], 16).unwrap_or_default()
}
