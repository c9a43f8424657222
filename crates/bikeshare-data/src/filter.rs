//! Month/weekday selection over a cleaned table.

use bikeshare_core::cities::{City, CitySchema};
use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{DateRange, TripRecord, TripTable};
use serde::Serialize;
use tracing::debug;

// ── TimeFilter ────────────────────────────────────────────────────────────────

/// Optional month and weekday predicates, applied conjunctively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeFilter {
    month: Option<u32>,
    weekday: Option<u32>,
}

impl TimeFilter {
    /// Selects every row.
    pub const NONE: TimeFilter = TimeFilter {
        month: None,
        weekday: None,
    };

    /// `month` must be 1-12 and `weekday` 0-6 (Monday = 0) when given.
    pub fn new(month: Option<u32>, weekday: Option<u32>) -> Result<Self> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(BikeshareError::InvalidMonth(m.to_string()));
            }
        }
        if let Some(d) = weekday {
            if d > 6 {
                return Err(BikeshareError::InvalidWeekday(d.to_string()));
            }
        }
        Ok(Self { month, weekday })
    }

    pub fn by_month(month: u32) -> Result<Self> {
        Self::new(Some(month), None)
    }

    pub fn by_weekday(weekday: u32) -> Result<Self> {
        Self::new(None, Some(weekday))
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn weekday(&self) -> Option<u32> {
        self.weekday
    }

    /// `true` when `record` satisfies every present predicate.
    pub fn matches(&self, record: &TripRecord) -> bool {
        self.month.map_or(true, |m| record.month == m)
            && self.weekday.map_or(true, |d| record.day_of_week == d)
    }
}

/// Select the rows of `table` that satisfy `filter`.
pub fn filter(table: &TripTable, filter: &TimeFilter) -> TripView {
    TripView::all(table).refine(filter)
}

// ── TripView ──────────────────────────────────────────────────────────────────

/// A read-only, possibly empty selection of a cleaned table's rows.
///
/// Holds a shared handle on the table's storage plus the selected row
/// indices in table order; creating or refining a view never copies or
/// mutates records.
#[derive(Debug, Clone)]
pub struct TripView {
    table: TripTable,
    indices: Vec<usize>,
}

impl TripView {
    /// View over every row of `table`.
    pub fn all(table: &TripTable) -> Self {
        Self {
            table: table.clone(),
            indices: (0..table.len()).collect(),
        }
    }

    /// Narrow this view by `filter`; the result views the same table.
    pub fn refine(&self, filter: &TimeFilter) -> TripView {
        let records = self.table.records();
        let indices: Vec<usize> = self
            .indices
            .iter()
            .copied()
            .filter(|&i| filter.matches(&records[i]))
            .collect();

        debug!(
            "Filter month={:?} weekday={:?}: {} of {} rows",
            filter.month,
            filter.weekday,
            indices.len(),
            self.indices.len()
        );

        TripView {
            table: self.table.clone(),
            indices,
        }
    }

    pub fn row_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// First and last start date in the view; `None` when empty.
    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::from_dates(self.iter().map(TripRecord::start_date))
    }

    /// Selected records in table-scan order.
    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Positions of the selected rows within the table.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn table(&self) -> &TripTable {
        &self.table
    }

    pub fn schema(&self) -> CitySchema {
        self.table.schema()
    }

    pub fn has_demographics(&self) -> bool {
        self.table.has_demographics()
    }

    pub fn city(&self) -> Option<City> {
        self.table.city()
    }
}

impl PartialEq for TripView {
    /// Same underlying table and same selected rows.
    fn eq(&self, other: &Self) -> bool {
        self.table.shares_storage_with(&other.table) && self.indices == other.indices
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
