//! Shared primitive types and small numeric helpers used across the oracle.

use chrono::{DateTime, Utc};

/// Wall-clock instant. Every core function takes "now" explicitly.
pub type Timestamp = DateTime<Utc>;

/// A UTC calendar day formatted as `YYYY-MM-DD`.
pub type DayKey = String;

/// Format the UTC calendar day of `at`.
pub fn day_key(at: Timestamp) -> DayKey {
    at.format("%Y-%m-%d").to_string()
}

/// Integer percentage of `n` over `d`, 0 when `d` is 0.
pub fn pct(n: usize, d: usize) -> u32 {
    if d == 0 {
        return 0;
    }
    ((n as f64 / d as f64) * 100.0).round() as u32
}

/// Round to one decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Round to whole cents.
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
