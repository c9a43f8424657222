//! Trip data pipeline for the bikeshare explorer.
//!
//! Reads a city's CSV into typed rows, cleans them into an immutable table,
//! selects rows by month and weekday, and computes the descriptive
//! statistics report over the selection.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod filter;
pub mod reader;
pub mod report;
pub mod statistics;

pub use analysis::{load_and_filter, load_city, LoadedCity};
pub use bikeshare_core as core;
pub use filter::{TimeFilter, TripView};
pub use reader::{fetch_raw_page, RawRow};
pub use report::{Report, Statistic};
pub use statistics::{compute_statistics, compute_statistics_with};
