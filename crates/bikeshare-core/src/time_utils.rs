use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::{BikeshareError, Result};

/// English month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English weekday names, index 0 = Monday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// ── Derived calendar fields ───────────────────────────────────────────────────

/// Month number, 1 = January.
pub fn month_of(ts: &NaiveDateTime) -> u32 {
    ts.month()
}

/// Weekday number, 0 = Monday … 6 = Sunday.
pub fn day_of_week(ts: &NaiveDateTime) -> u32 {
    ts.weekday().num_days_from_monday()
}

/// Hour bucket formatted as `"HH:00:00"`.
pub fn hour_bucket(ts: &NaiveDateTime) -> String {
    format!("{:02}:00:00", ts.hour())
}

// ── Names ─────────────────────────────────────────────────────────────────────

/// Name for a 1-based month number, `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

/// Name for a 0-based weekday number, `None` outside 0..=6.
pub fn weekday_name(day: u32) -> Option<&'static str> {
    WEEKDAY_NAMES.get(day as usize).copied()
}

// ── Selector parsing ──────────────────────────────────────────────────────────

/// Parse a month selector: `1`-`12`, a full English name or its
/// three-letter abbreviation (case-insensitive).
pub fn parse_month(input: &str) -> Result<u32> {
    let s = input.trim().to_lowercase();
    if let Ok(n) = s.parse::<u32>() {
        return if (1..=12).contains(&n) {
            Ok(n)
        } else {
            Err(BikeshareError::InvalidMonth(input.to_string()))
        };
    }
    MONTH_NAMES
        .iter()
        .position(|name| matches_name(&s, name))
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| BikeshareError::InvalidMonth(input.to_string()))
}

/// Parse a weekday selector: `0`-`6` (Monday = 0), a full English name or
/// its three-letter abbreviation (case-insensitive).
pub fn parse_weekday(input: &str) -> Result<u32> {
    let s = input.trim().to_lowercase();
    if let Ok(n) = s.parse::<u32>() {
        return if n <= 6 {
            Ok(n)
        } else {
            Err(BikeshareError::InvalidWeekday(input.to_string()))
        };
    }
    WEEKDAY_NAMES
        .iter()
        .position(|name| matches_name(&s, name))
        .map(|idx| idx as u32)
        .ok_or_else(|| BikeshareError::InvalidWeekday(input.to_string()))
}

fn matches_name(lowered: &str, name: &str) -> bool {
    let full = name.to_lowercase();
    lowered == full || (lowered.len() == 3 && full.starts_with(lowered))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
