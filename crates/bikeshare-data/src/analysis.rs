//! Load, clean and filter pipeline.
//!
//! Ties the reader, cleaner and filter together so callers go from a city
//! name to a [`TripView`] in one call. Statistics are computed separately
//! so an empty view can be reported before asking for them.

use std::time::Instant;

use bikeshare_core::cities::{City, CityRegistry};
use bikeshare_core::error::Result;
use bikeshare_core::models::TripTable;
use serde::Serialize;
use tracing::debug;

use crate::cleaner::{clean_with_summary, CleaningSummary};
use crate::filter::{TimeFilter, TripView};
use crate::reader::load_raw_table;

// ── Public types ──────────────────────────────────────────────────────────────

/// A freshly loaded and cleaned city table plus how it got there.
#[derive(Debug, Clone)]
pub struct LoadedCity {
    pub table: TripTable,
    pub metadata: LoadMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadMetadata {
    pub city: City,
    pub cleaning: CleaningSummary,
    /// Wall-clock seconds spent reading the CSV.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent cleaning.
    pub clean_time_seconds: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Read and clean `city`'s source file.
///
/// 1. Parse the CSV into raw rows (fatal on any parse error).
/// 2. Clean the rows into an immutable [`TripTable`].
pub fn load_city(registry: &CityRegistry, city: City) -> Result<LoadedCity> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = Instant::now();
    let raw = load_raw_table(registry, city)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Clean ─────────────────────────────────────────────────────────
    let clean_start = Instant::now();
    let (table, cleaning) = clean_with_summary(raw);
    let clean_time = clean_start.elapsed().as_secs_f64();

    debug!(
        "{}: {} rows loaded in {:.3}s, cleaned in {:.3}s",
        city, table.len(), load_time, clean_time
    );

    Ok(LoadedCity {
        table,
        metadata: LoadMetadata {
            city,
            cleaning,
            load_time_seconds: load_time,
            clean_time_seconds: clean_time,
        },
    })
}

/// Load and clean `city`, then apply `filter`.
///
/// The returned view may be empty; check [`TripView::is_empty`] before
/// computing statistics.
pub fn load_and_filter(registry: &CityRegistry, city: City, filter: &TimeFilter) -> Result<TripView> {
    let loaded = load_city(registry, city)?;
    Ok(TripView::all(&loaded.table).refine(filter))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::error::BikeshareError;
    use std::io::Write;
    use tempfile::TempDir;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-02 09:07:57,2017-01-02 09:20:53,776,Canal St & Adams St,Clinton St & Madison St,Subscriber,Male,1984.0
2,2017-01-05 12:00:00,2017-01-05 12:30:00,1800,Canal St & Adams St,Lake Shore Dr & Monroe St,Customer,,
3,2017-02-06 17:00:00,2017-02-06 17:05:00,300,Clinton St & Madison St,Canal St & Adams St,Subscriber,Female,1900.0
4,2017-03-06 17:30:00,2017-03-06 17:40:00,600,Clinton St & Madison St,Canal St & Adams St,Subscriber,Female,1990.0
";

    fn write_csv(dir: &std::path::Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        write!(file, "{}", content).unwrap();
    }

    #[test]
    fn test_load_city_cleans_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO);
        let registry = CityRegistry::new(dir.path());

        let loaded = load_city(&registry, City::Chicago).unwrap();

        assert_eq!(loaded.table.len(), 3);
        assert_eq!(loaded.table.city(), Some(City::Chicago));
        assert_eq!(loaded.metadata.cleaning.rows_in, 4);
        assert_eq!(loaded.metadata.cleaning.outliers_rejected, 1);
        assert_eq!(loaded.metadata.cleaning.genders_defaulted, 1);
        assert!(loaded.metadata.load_time_seconds >= 0.0);
    }

    #[test]
    fn test_load_and_filter_by_month() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO);
        let registry = CityRegistry::new(dir.path());

        let view = load_and_filter(&registry, City::Chicago, &TimeFilter::by_month(1).unwrap()).unwrap();

        assert_eq!(view.row_count(), 2);
        let range = view.date_range().unwrap();
        assert_eq!(range.start.to_string(), "2017-01-02");
        assert_eq!(range.end.to_string(), "2017-01-05");
    }

    #[test]
    fn test_load_and_filter_empty_result_is_ok() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO);
        let registry = CityRegistry::new(dir.path());

        let view = load_and_filter(&registry, City::Chicago, &TimeFilter::by_month(6).unwrap()).unwrap();

        assert!(view.is_empty());
        assert!(view.date_range().is_none());
    }

    #[test]
    fn test_load_and_filter_missing_file() {
        let dir = TempDir::new().unwrap();
        let registry = CityRegistry::new(dir.path());

        let err = load_and_filter(&registry, City::Washington, &TimeFilter::NONE).unwrap_err();

        assert!(matches!(err, BikeshareError::FileRead { .. }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_reload_reflects_file_changes() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO);
        let registry = CityRegistry::new(dir.path());
        let before = load_and_filter(&registry, City::Chicago, &TimeFilter::NONE).unwrap();

        let header_and_first: String = CHICAGO.lines().take(2).map(|l| format!("{l}\n")).collect();
        write_csv(dir.path(), "chicago.csv", &header_and_first);
        let after = load_and_filter(&registry, City::Chicago, &TimeFilter::NONE).unwrap();

        assert_eq!(before.row_count(), 3);
        assert_eq!(after.row_count(), 1);
    }
}
