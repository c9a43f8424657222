use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cities::{City, CityRegistry};
use crate::error::Result;
use crate::formatting::MinuteRounding;
use crate::time_utils::{parse_month, parse_weekday};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Explore US bikeshare trip data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Descriptive statistics over US bikeshare trip logs",
    version
)]
pub struct Settings {
    /// City to analyse (chicago, new york city, washington)
    #[arg(long, short = 'c')]
    pub city: String,

    /// Month filter: 1-12 or a month name
    #[arg(long, short = 'm')]
    pub month: Option<String>,

    /// Weekday filter: 0-6 (Monday = 0) or a weekday name
    #[arg(long, short = 'd')]
    pub day: Option<String>,

    /// Directory holding the city CSV files
    #[arg(long, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Rounding applied when converting seconds to minutes
    #[arg(long, value_enum, default_value_t = MinuteRounding::HalfEven)]
    pub rounding: MinuteRounding,

    /// Number of raw-data pages to print after the statistics
    #[arg(long, default_value = "0")]
    pub raw_pages: usize,

    /// Rows per raw-data page
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..=100))]
    pub page_size: u64,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// City and filter selectors after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub city: City,
    /// 1 = January.
    pub month: Option<u32>,
    /// 0 = Monday.
    pub weekday: Option<u32>,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::apply_overrides(Settings::parse())
    }

    /// Same as [`Settings::load`] over an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::apply_overrides)
    }

    /// `--debug` overrides the log level.
    fn apply_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Validate the city, month and weekday selectors.
    pub fn query(&self) -> Result<Query> {
        Ok(Query {
            city: self.registry().get_by_name(&self.city)?.city,
            month: self.month.as_deref().map(parse_month).transpose()?,
            weekday: self.day.as_deref().map(parse_weekday).transpose()?,
        })
    }

    /// Build the immutable registry rooted at `--data-dir`.
    pub fn registry(&self) -> CityRegistry {
        CityRegistry::new(self.data_dir.clone())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
