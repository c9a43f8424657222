//! Structured output of the statistics engine.
//!
//! Every type here is plain data with `serde::Serialize`; formatting for
//! humans lives in the binary.

use bikeshare_core::cities::City;
use bikeshare_core::formatting::MinuteRounding;
use bikeshare_core::models::DateRange;
use serde::Serialize;

// ── Statistic ─────────────────────────────────────────────────────────────────

/// A report field that may not apply to the viewed city.
///
/// `Unavailable` is a normal state (e.g. gender for a city without
/// demographics), never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Statistic<T> {
    Available(T),
    Unavailable,
}

impl<T> Statistic<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Statistic::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Statistic::Available(v) => Some(v),
            Statistic::Unavailable => None,
        }
    }

    /// `Available(f())` when `present`, otherwise `Unavailable`.
    pub fn when(present: bool, f: impl FnOnce() -> T) -> Self {
        if present {
            Statistic::Available(f())
        } else {
            Statistic::Unavailable
        }
    }
}

/// A value and how many rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: u64,
}

impl<T> From<(T, u64)> for ValueCount<T> {
    fn from((value, count): (T, u64)) -> Self {
        Self { value, count }
    }
}

// ── User statistics ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearAge {
    pub birth_year: i32,
    pub age: i32,
}

/// Birth-year extremes. `youngest` pairs the latest birth year with the
/// minimum age; `oldest` the earliest birth year with the maximum age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearRange {
    pub youngest: BirthYearAge,
    pub oldest: BirthYearAge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    /// Descending count; empty user-type cells are not counted.
    pub user_types: Vec<ValueCount<String>>,
    pub genders: Statistic<Vec<ValueCount<String>>>,
    /// `Available(None)` when no row in the view has a birth year.
    pub birth_years: Statistic<Option<BirthYearRange>>,
}

// ── Time statistics ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// 1 = January.
    pub popular_month: ValueCount<u32>,
    /// 0 = Monday.
    pub popular_weekday: ValueCount<u32>,
    pub popular_hour: ValueCount<String>,
    pub least_popular_hour: ValueCount<String>,
}

// ── Station statistics ────────────────────────────────────────────────────────

/// The most frequent station pair, split into its two stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    pub start_station: String,
    pub end_station: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub popular_start: ValueCount<String>,
    pub least_popular_start: ValueCount<String>,
    pub popular_end: ValueCount<String>,
    pub least_popular_end: ValueCount<String>,
    pub popular_route: RouteCount,
}

// ── Duration statistics ───────────────────────────────────────────────────────

/// Mean trip duration for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: String,
    pub mean_seconds: f64,
    pub mean_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub min_minutes: i64,
    pub mean_minutes: i64,
    pub max_minutes: i64,
    pub total_minutes: i64,
    pub total_seconds: f64,
    pub mean_seconds: f64,
    /// Up to three start stations with the highest mean duration.
    pub longest_mean_stations: Vec<GroupMean>,
    pub mean_by_user_type: Vec<GroupMean>,
    pub mean_by_gender: Statistic<Vec<GroupMean>>,
    /// Pearson r between duration and age; `Available(None)` when undefined.
    pub age_correlation: Statistic<Option<f64>>,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Wall-clock seconds spent on each statistic group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupTimings {
    pub user_seconds: f64,
    pub time_seconds: f64,
    pub station_seconds: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub city: Option<City>,
    pub row_count: usize,
    pub date_range: Option<DateRange>,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub rounding: MinuteRounding,
    pub timings: GroupTimings,
}

/// All statistic groups computed over one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub users: UserStats,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
