use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bikeshare pipeline.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the source (ragged row, bad UTF-8, ...).
    #[error("Malformed CSV in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The header lacks a column the city's schema requires.
    #[error("Missing column \"{column}\" in {source_name}")]
    MissingColumn { source_name: String, column: String },

    /// A timestamp cell did not match any recognised date-time format.
    #[error("Invalid timestamp in row {row}, column \"{column}\": {value:?}")]
    TimestampParse {
        row: u64,
        column: String,
        value: String,
    },

    /// A required numeric cell was empty, non-numeric or out of range.
    #[error("Invalid number in row {row}, column \"{column}\": {value:?}")]
    InvalidNumber {
        row: u64,
        column: String,
        value: String,
    },

    /// Statistics were requested on a view that selects no rows.
    #[error("Cannot compute statistics on an empty view")]
    EmptyView,

    /// A city name is not one of the registered cities.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// A month selector is neither 1-12 nor a month name.
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// A weekday selector is neither 0-6 nor a weekday name.
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),
}

impl BikeshareError {
    /// `true` for every error that makes a load fail: unreadable source,
    /// malformed CSV, missing column, bad timestamp or bad number.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            BikeshareError::FileRead { .. }
                | BikeshareError::Csv { .. }
                | BikeshareError::MissingColumn { .. }
                | BikeshareError::TimestampParse { .. }
                | BikeshareError::InvalidNumber { .. }
        )
    }
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;
