//! CSV loading for the city trip logs.
//!
//! [`load_raw_table`] parses a city's file into typed [`RawTrip`] rows and
//! fails the whole load on the first bad cell. [`fetch_raw_page`] is an
//! untyped pass-through to the same file for paging through source rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bikeshare_core::cities::{City, CityRegistry, CitySchema};
use bikeshare_core::data_processors::{NumericProcessor, TimestampProcessor};
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{RawDemographics, RawTable, RawTrip};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

/// Source column headers.
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `city`'s source file from the registry.
///
/// Every call re-reads the file; nothing is cached.
pub fn load_raw_table(registry: &CityRegistry, city: City) -> Result<RawTable> {
    let path = registry.source_path(city)?;
    let schema = registry.schema(city)?;
    let file = open_source(&path)?;

    let mut table = read_raw_table(file, &path.display().to_string(), schema)?;
    table.city = Some(city);
    Ok(table)
}

/// Parse CSV text from any reader under `schema`.
///
/// `source_name` only labels log lines and errors. Fails with a parse error
/// on a missing required column, a ragged row, a malformed timestamp or an
/// invalid trip duration; no partial table is returned.
pub fn read_raw_table<R: Read>(reader: R, source_name: &str, schema: CitySchema) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();
    let layout = ColumnLayout::resolve(&headers, schema, source_name)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        rows.push(layout.parse_row(&record, idx as u64 + 1)?);
    }

    debug!(
        "Loaded {} rows from {} (demographics: {})",
        rows.len(),
        source_name,
        schema.has_demographics
    );

    Ok(RawTable {
        city: None,
        source_name: source_name.to_string(),
        schema,
        rows,
    })
}

/// One untouched source row, as `(header, cell)` pairs in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    /// 0-based position among the data rows of the file.
    pub index: u64,
    pub fields: Vec<(String, String)>,
}

/// Read `page_size` source rows of `city` starting at `start_index`.
///
/// The rows are neither cleaned nor filtered. A leading unnamed index column
/// is left out. Pages past the end of the file are empty.
pub fn fetch_raw_page(
    registry: &CityRegistry,
    city: City,
    start_index: u64,
    page_size: u64,
) -> Result<Vec<RawRow>> {
    let path = registry.source_path(city)?;
    let file = open_source(&path)?;
    read_raw_page(file, &path.display().to_string(), start_index, page_size)
}

/// [`fetch_raw_page`] over any reader.
pub fn read_raw_page<R: Read>(
    reader: R,
    source_name: &str,
    start_index: u64,
    page_size: u64,
) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .clone();
    let skip_first = headers.get(0).is_some_and(|h| h.trim().is_empty());

    let mut page = Vec::new();
    for (idx, result) in rdr
        .records()
        .enumerate()
        .skip(start_index as usize)
        .take(page_size as usize)
    {
        let record = result.map_err(|e| csv_error(source_name, e))?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .skip(usize::from(skip_first))
            .map(|(h, v)| (h.trim().to_string(), v.to_string()))
            .collect();
        page.push(RawRow {
            index: idx as u64,
            fields,
        });
    }

    Ok(page)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| BikeshareError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_error(source_name: &str, source: csv::Error) -> BikeshareError {
    BikeshareError::Csv {
        source_name: source_name.to_string(),
        source,
    }
}

/// Positions of the schema's columns within a header row.
#[derive(Debug)]
struct ColumnLayout {
    start_time: usize,
    end_time: usize,
    trip_duration: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    /// `(gender, birth_year)`, resolved only for demographic schemas.
    demographics: Option<(usize, usize)>,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord, schema: CitySchema, source_name: &str) -> Result<Self> {
        let find = |column: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| BikeshareError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.to_string(),
                })
        };

        let demographics = if schema.has_demographics {
            Some((find(columns::GENDER)?, find(columns::BIRTH_YEAR)?))
        } else {
            None
        };

        Ok(Self {
            start_time: find(columns::START_TIME)?,
            end_time: find(columns::END_TIME)?,
            trip_duration: find(columns::TRIP_DURATION)?,
            start_station: find(columns::START_STATION)?,
            end_station: find(columns::END_STATION)?,
            user_type: find(columns::USER_TYPE)?,
            demographics,
        })
    }

    fn parse_row(&self, record: &csv::StringRecord, row: u64) -> Result<RawTrip> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let timestamp = |idx: usize, column: &str| -> Result<NaiveDateTime> {
            TimestampProcessor::parse(cell(idx)).ok_or_else(|| BikeshareError::TimestampParse {
                row,
                column: column.to_string(),
                value: cell(idx).to_string(),
            })
        };

        let duration_cell = cell(self.trip_duration);
        let trip_duration_seconds = NumericProcessor::parse_duration(duration_cell).ok_or_else(|| {
            BikeshareError::InvalidNumber {
                row,
                column: columns::TRIP_DURATION.to_string(),
                value: duration_cell.to_string(),
            }
        })?;

        let demographics = self.demographics.map(|(gender, birth_year)| RawDemographics {
            gender: non_empty(cell(gender)),
            birth_year: non_empty(cell(birth_year)),
        });

        Ok(RawTrip {
            start_time: timestamp(self.start_time, columns::START_TIME)?,
            end_time: timestamp(self.end_time, columns::END_TIME)?,
            start_station: cell(self.start_station).to_string(),
            end_station: cell(self.end_station).to_string(),
            trip_duration_seconds,
            user_type: non_empty(cell(self.user_type)),
            demographics,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CHICAGO_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON_CSV: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,
";

    fn write_csv(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    // ── read_raw_table ────────────────────────────────────────────────────────

    #[test]
    fn test_read_demographic_table() {
        let table =
            read_raw_table(CHICAGO_CSV.as_bytes(), "chicago.csv", CitySchema::WITH_DEMOGRAPHICS)
                .unwrap();

        assert_eq!(table.rows.len(), 3);
        let first = &table.rows[0];
        assert_eq!(first.start_station, "Wood St & Hubbard St");
        assert_eq!(first.end_station, "Damen Ave & Chicago Ave");
        assert_eq!(first.trip_duration_seconds, 321.0);
        assert_eq!(first.user_type.as_deref(), Some("Subscriber"));
        let demo = first.demographics.as_ref().unwrap();
        assert_eq!(demo.gender.as_deref(), Some("Male"));
        assert_eq!(demo.birth_year.as_deref(), Some("1992.0"));
    }

    #[test]
    fn test_read_demographic_table_empty_cells_are_none() {
        let table =
            read_raw_table(CHICAGO_CSV.as_bytes(), "chicago.csv", CitySchema::WITH_DEMOGRAPHICS)
                .unwrap();
        let demo = table.rows[2].demographics.as_ref().unwrap();
        assert!(demo.gender.is_none());
        assert!(demo.birth_year.is_none());
    }

    #[test]
    fn test_read_non_demographic_table() {
        let table = read_raw_table(
            WASHINGTON_CSV.as_bytes(),
            "washington.csv",
            CitySchema::WITHOUT_DEMOGRAPHICS,
        )
        .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert!(table.rows.iter().all(|r| r.demographics.is_none()));
        assert!((table.rows[0].trip_duration_seconds - 489.066).abs() < 1e-9);
        assert!(table.rows[1].user_type.is_none());
    }

    #[test]
    fn test_demographic_schema_requires_gender_column() {
        let err = read_raw_table(
            WASHINGTON_CSV.as_bytes(),
            "washington.csv",
            CitySchema::WITH_DEMOGRAPHICS,
        )
        .unwrap_err();
        assert!(err.is_parse_error());
        assert!(
            matches!(err, BikeshareError::MissingColumn { ref column, .. } if column == "Gender")
        );
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "Start Time,End Time,Trip Duration,Start Station,End Station\n\
                   2017-01-01 00:00:00,2017-01-01 00:05:00,300,A,B\n";
        let err =
            read_raw_table(csv.as_bytes(), "x.csv", CitySchema::WITHOUT_DEMOGRAPHICS).unwrap_err();
        assert!(
            matches!(err, BikeshareError::MissingColumn { ref column, .. } if column == "User Type")
        );
    }

    #[test]
    fn test_malformed_timestamp_fails_whole_load() {
        let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-01-01 00:00:00,2017-01-01 00:05:00,300,A,B,Subscriber\n\
                   not-a-time,2017-01-01 00:05:00,300,A,B,Subscriber\n";
        let err =
            read_raw_table(csv.as_bytes(), "x.csv", CitySchema::WITHOUT_DEMOGRAPHICS).unwrap_err();
        match err {
            BikeshareError::TimestampParse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Start Time");
                assert_eq!(value, "not-a-time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_duration_fails() {
        let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-01-01 00:00:00,2017-01-01 00:05:00,five,A,B,Subscriber\n";
        let err =
            read_raw_table(csv.as_bytes(), "x.csv", CitySchema::WITHOUT_DEMOGRAPHICS).unwrap_err();
        assert!(matches!(err, BikeshareError::InvalidNumber { row: 1, .. }));
    }

    #[test]
    fn test_ragged_row_fails() {
        let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n\
                   2017-01-01 00:00:00,2017-01-01 00:05:00,300,A\n";
        let err =
            read_raw_table(csv.as_bytes(), "x.csv", CitySchema::WITHOUT_DEMOGRAPHICS).unwrap_err();
        assert!(matches!(err, BikeshareError::Csv { .. }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let csv = "Start Time,End Time,Trip Duration,Start Station,End Station,User Type\n";
        let table =
            read_raw_table(csv.as_bytes(), "x.csv", CitySchema::WITHOUT_DEMOGRAPHICS).unwrap();
        assert!(table.rows.is_empty());
    }

    // ── load_raw_table ────────────────────────────────────────────────────────

    #[test]
    fn test_load_raw_table_from_registry() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", CHICAGO_CSV);
        let registry = CityRegistry::new(dir.path());

        let table = load_raw_table(&registry, City::Chicago).unwrap();
        assert_eq!(table.city, Some(City::Chicago));
        assert!(table.schema.has_demographics);
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn test_load_raw_table_missing_file() {
        let dir = TempDir::new().unwrap();
        let registry = CityRegistry::new(dir.path());
        let err = load_raw_table(&registry, City::Washington).unwrap_err();
        assert!(matches!(err, BikeshareError::FileRead { .. }));
    }

    #[test]
    fn test_load_raw_table_rereads_each_call() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "washington.csv", WASHINGTON_CSV);
        let registry = CityRegistry::new(dir.path());
        assert_eq!(load_raw_table(&registry, City::Washington).unwrap().rows.len(), 2);

        let header_only = WASHINGTON_CSV.lines().next().unwrap().to_string() + "\n";
        write_csv(dir.path(), "washington.csv", &header_only);
        assert!(load_raw_table(&registry, City::Washington).unwrap().rows.is_empty());
    }

    // ── fetch_raw_page ────────────────────────────────────────────────────────

    #[test]
    fn test_read_raw_page_skips_index_column() {
        let page = read_raw_page(CHICAGO_CSV.as_bytes(), "chicago.csv", 0, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].index, 0);
        assert_eq!(page[0].fields[0], ("Start Time".to_string(), "2017-06-23 15:09:32".to_string()));
        assert_eq!(page[0].fields.len(), 8);
        assert_eq!(page[1].index, 1);
    }

    #[test]
    fn test_read_raw_page_is_uncleaned() {
        let page = read_raw_page(CHICAGO_CSV.as_bytes(), "chicago.csv", 2, 5).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].index, 2);
        let gender = page[0].fields.iter().find(|(h, _)| h == "Gender").unwrap();
        assert_eq!(gender.1, "");
    }

    #[test]
    fn test_read_raw_page_past_end_is_empty() {
        let page = read_raw_page(CHICAGO_CSV.as_bytes(), "chicago.csv", 10, 5).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_fetch_raw_page_keeps_named_first_column() {
        let csv = "Start Time,User Type\n2017-01-01 00:00:00,Subscriber\n";
        let page = read_raw_page(csv.as_bytes(), "x.csv", 0, 5).unwrap();
        assert_eq!(page[0].fields[0].0, "Start Time");
    }

    #[test]
    fn test_fetch_raw_page_from_registry() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "washington.csv", WASHINGTON_CSV);
        let registry = CityRegistry::new(dir.path());

        let page = fetch_raw_page(&registry, City::Washington, 1, 5).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].index, 1);
    }
}
