//! Normalisation of raw trip rows into the immutable cleaned table.

use bikeshare_core::cities::CitySchema;
use bikeshare_core::data_processors::NumericProcessor;
use bikeshare_core::models::{Demographics, RawDemographics, RawTable, RawTrip, TripRecord, TripTable};
use bikeshare_core::time_utils::{day_of_week, hour_bucket, month_of};
use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, warn};

/// Birth years below this are rejected as data-capture outliers.
pub const MIN_BIRTH_YEAR: i32 = 1912;

/// Category assigned when a demographic row has no gender.
pub const UNKNOWN_GENDER: &str = "Unknown";

/// Separator between the two stations of a station pair.
pub const STATION_PAIR_SEPARATOR: &str = " - ";

/// What a cleaning pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Rows dropped for a birth year before [`MIN_BIRTH_YEAR`].
    pub outliers_rejected: usize,
    /// Empty gender cells replaced with [`UNKNOWN_GENDER`].
    pub genders_defaulted: usize,
    /// Non-empty birth-year cells that were not numeric.
    pub birth_years_coerced: usize,
    /// Kept rows whose birth year is after the trip year.
    pub negative_ages: usize,
}

/// Clean `raw` under its own schema.
pub fn clean(raw: RawTable) -> TripTable {
    clean_with_summary(raw).0
}

/// Clean `raw` and report what changed.
///
/// Demographic schemas get gender defaulting, birth-year coercion, outlier
/// rejection and age derivation; every surviving row gets its calendar
/// fields and station pair. Only outlier rows are dropped.
pub fn clean_with_summary(raw: RawTable) -> (TripTable, CleaningSummary) {
    let schema = raw.schema;
    let mut summary = CleaningSummary {
        rows_in: raw.rows.len(),
        ..CleaningSummary::default()
    };

    let records: Vec<TripRecord> = raw
        .rows
        .into_iter()
        .filter_map(|row| clean_row(row, schema, &mut summary))
        .collect();

    summary.rows_out = records.len();

    debug!(
        "Cleaned {}: {} rows in, {} out, {} outliers, {} genders defaulted, {} birth years coerced",
        raw.source_name,
        summary.rows_in,
        summary.rows_out,
        summary.outliers_rejected,
        summary.genders_defaulted,
        summary.birth_years_coerced,
    );
    if summary.negative_ages > 0 {
        warn!(
            "{}: {} rows have a birth year after the trip year; ages kept as negative",
            raw.source_name, summary.negative_ages
        );
    }

    (TripTable::new(raw.city, schema, records), summary)
}

fn clean_row(mut row: RawTrip, schema: CitySchema, summary: &mut CleaningSummary) -> Option<TripRecord> {
    let demographics = if schema.has_demographics {
        let raw = row.demographics.take().unwrap_or(RawDemographics {
            gender: None,
            birth_year: None,
        });
        Some(clean_demographics(raw, row.start_time.year(), summary)?)
    } else {
        None
    };

    let station_pair = format!(
        "{}{}{}",
        row.start_station, STATION_PAIR_SEPARATOR, row.end_station
    );

    Some(TripRecord {
        month: month_of(&row.start_time),
        day_of_week: day_of_week(&row.start_time),
        hour_of_day: hour_bucket(&row.start_time),
        station_pair,
        start_time: row.start_time,
        end_time: row.end_time,
        start_station: row.start_station,
        end_station: row.end_station,
        trip_duration_seconds: row.trip_duration_seconds,
        user_type: row.user_type,
        demographics,
    })
}

/// `None` means the row is an outlier and must be dropped.
fn clean_demographics(
    raw: RawDemographics,
    trip_year: i32,
    summary: &mut CleaningSummary,
) -> Option<Demographics> {
    let numeric_year = raw.birth_year.as_deref().and_then(|cell| {
        let year = NumericProcessor::coerce_birth_year(cell);
        if year.is_none() {
            summary.birth_years_coerced += 1;
        }
        year
    });

    // Outliers are judged on the numeric value, before narrowing to a whole year.
    if numeric_year.is_some_and(|year| year < f64::from(MIN_BIRTH_YEAR)) {
        summary.outliers_rejected += 1;
        return None;
    }
    let birth_year = numeric_year.map(|year| year.floor() as i32);

    let gender = raw.gender.unwrap_or_else(|| {
        summary.genders_defaulted += 1;
        UNKNOWN_GENDER.to_string()
    });

    let age = birth_year.map(|year| trip_year - year);
    if age.is_some_and(|a| a < 0) {
        summary.negative_ages += 1;
    }

    Some(Demographics {
        gender,
        birth_year,
        age,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
