use chrono::{NaiveDate, NaiveDateTime};
use tracing::trace;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses the naive local timestamps found in trip logs.
pub struct TimestampProcessor;

impl TimestampProcessor {
    const FORMATS: &'static [&'static str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    /// Parse a timestamp cell. Handles:
    /// * `YYYY-MM-DD HH:MM:SS` with optional fractional seconds
    /// * the same with a `T` separator
    /// * `YYYY-MM-DD HH:MM`
    /// * date-only `YYYY-MM-DD` (midnight)
    ///
    /// Returns `None` for empty or unrecognised input.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }

        trace!("TimestampProcessor: unrecognised timestamp {:?}", s);
        None
    }
}

// ── NumericProcessor ──────────────────────────────────────────────────────────

/// Numeric coercions applied to trip-log cells.
pub struct NumericProcessor;

impl NumericProcessor {
    /// Parse a trip duration in seconds. Only finite, non-negative values
    /// are accepted.
    pub fn parse_duration(s: &str) -> Option<f64> {
        let value: f64 = s.trim().parse().ok()?;
        (value.is_finite() && value >= 0.0).then_some(value)
    }

    /// Lenient birth-year coercion: any finite number is kept as-is, so a
    /// fractional year still takes part in outlier checks. Empty and
    /// non-numeric cells become `None`.
    pub fn coerce_birth_year(s: &str) -> Option<f64> {
        let value: f64 = s.trim().parse().ok()?;
        value.is_finite().then_some(value)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
