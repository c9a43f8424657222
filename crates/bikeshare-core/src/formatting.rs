use serde::{Deserialize, Serialize};

// ── Minute conversion ─────────────────────────────────────────────────────────

/// How a seconds figure is rounded to whole minutes. Never truncates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MinuteRounding {
    /// Round half to even (banker's rounding): 0.5 → 0, 1.5 → 2, 2.5 → 2.
    #[default]
    HalfEven,
    /// Round half away from zero: 0.5 → 1, 2.5 → 3.
    #[value(name = "half-away")]
    HalfAwayFromZero,
}

impl MinuteRounding {
    /// Round `value` to the nearest integer under this mode.
    pub fn round(self, value: f64) -> f64 {
        match self {
            MinuteRounding::HalfEven => value.round_ties_even(),
            MinuteRounding::HalfAwayFromZero => value.round(),
        }
    }
}

/// Convert a seconds figure to whole minutes: divide by 60, then round once.
///
/// Callers must aggregate (sum, mean, ...) in seconds first and convert the
/// result, never convert per row and aggregate the rounded values.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::{seconds_to_minutes, MinuteRounding};
///
/// assert_eq!(seconds_to_minutes(120.0, MinuteRounding::HalfEven), 2);
/// assert_eq!(seconds_to_minutes(90.0, MinuteRounding::HalfEven), 2);
/// assert_eq!(seconds_to_minutes(150.0, MinuteRounding::HalfEven), 2);
/// assert_eq!(seconds_to_minutes(150.0, MinuteRounding::HalfAwayFromZero), 3);
/// ```
pub fn seconds_to_minutes(seconds: f64, rounding: MinuteRounding) -> i64 {
    rounding.round(seconds / 60.0) as i64
}

// ── Number formatting ─────────────────────────────────────────────────────────

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use bikeshare_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-0.25, 2), "-0.25");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact decimal midpoints stored slightly
    // below the midpoint in binary still round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` looks like "0.50"; keep ".50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an integer count with thousands separators.
///
/// ```
/// use bikeshare_core::formatting::format_count;
///
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// assert_eq!(format_count(-4_200), "-4,200");
/// ```
pub fn format_count(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `"1 minute"` or `"N minutes"` with thousands separators.
pub fn format_minutes(minutes: i64) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", format_count(minutes))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
