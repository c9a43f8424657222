use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cities::{City, CitySchema};

// ── Raw (pre-clean) records ────────────────────────────────────────────────────

/// Demographic cells exactly as read from the source, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDemographics {
    /// `None` when the cell is empty.
    pub gender: Option<String>,
    /// Unparsed `Birth Year` cell; `None` when empty.
    pub birth_year: Option<String>,
}

/// One source row with timestamps and duration parsed but nothing derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub trip_duration_seconds: f64,
    /// `None` when the `User Type` cell is empty.
    pub user_type: Option<String>,
    /// Present only for sources whose schema has demographics.
    pub demographics: Option<RawDemographics>,
}

/// Everything a single load produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub city: Option<City>,
    /// Path or label of the source, used in log and error messages.
    pub source_name: String,
    pub schema: CitySchema,
    pub rows: Vec<RawTrip>,
}

// ── Cleaned records ────────────────────────────────────────────────────────────

/// Rider attributes, attached only to records of demographic-capable cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    /// `"Unknown"` when the source cell was empty.
    pub gender: String,
    pub birth_year: Option<i32>,
    /// `start_time.year - birth_year`; may be negative for bad source data.
    pub age: Option<i32>,
}

/// One row of a cleaned table, derived fields included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub trip_duration_seconds: f64,
    pub user_type: Option<String>,
    pub demographics: Option<Demographics>,
    /// 1 = January.
    pub month: u32,
    /// 0 = Monday … 6 = Sunday.
    pub day_of_week: u32,
    /// Start hour bucket formatted `"HH:00:00"`.
    pub hour_of_day: String,
    /// `"<start station> - <end station>"`.
    pub station_pair: String,
}

impl TripRecord {
    pub fn gender(&self) -> Option<&str> {
        self.demographics.as_ref().map(|d| d.gender.as_str())
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.demographics.as_ref().and_then(|d| d.birth_year)
    }

    pub fn age(&self) -> Option<i32> {
        self.demographics.as_ref().and_then(|d| d.age)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date()
    }
}

/// Inclusive span of start dates covered by a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Span of `dates`, or `None` when the iterator is empty.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(DateRange {
                start: date,
                end: date,
            }),
            Some(range) => Some(DateRange {
                start: range.start.min(date),
                end: range.end.max(date),
            }),
        })
    }
}

/// A cleaned, immutable table of trips.
///
/// Records sit behind an `Arc` so views and concurrent readers share the
/// storage; nothing hands out mutable access after construction.
#[derive(Debug, Clone)]
pub struct TripTable {
    city: Option<City>,
    schema: CitySchema,
    records: Arc<[TripRecord]>,
}

impl TripTable {
    pub fn new(city: Option<City>, schema: CitySchema, records: Vec<TripRecord>) -> Self {
        Self {
            city,
            schema,
            records: records.into(),
        }
    }

    pub fn city(&self) -> Option<City> {
        self.city
    }

    pub fn schema(&self) -> CitySchema {
        self.schema
    }

    pub fn has_demographics(&self) -> bool {
        self.schema.has_demographics
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` when both handles point at the same storage.
    pub fn shares_storage_with(&self, other: &TripTable) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
