//! The fixed set of supported cities and where their trip logs live.

use crate::error::{BikeshareError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Cities with published trip logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    /// Published without rider gender or birth year.
    Washington,
}

impl City {
    /// Every supported city, in display order.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// The canonical lowercase name, e.g. `"new york city"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Title-cased name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    /// Case-insensitive; spaces, hyphens and underscores are interchangeable,
    /// and `"nyc"` is accepted for New York City.
    fn from_str(value: &str) -> Result<Self> {
        let normalised: String = value
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        match normalised.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(BikeshareError::UnknownCity(value.to_string())),
        }
    }
}

/// Schema descriptor for a city's source file.
///
/// Every component branches on `has_demographics` rather than on the city
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySchema {
    /// Source carries `Gender` and `Birth Year` columns.
    pub has_demographics: bool,
}

impl CitySchema {
    pub const WITH_DEMOGRAPHICS: CitySchema = CitySchema {
        has_demographics: true,
    };
    pub const WITHOUT_DEMOGRAPHICS: CitySchema = CitySchema {
        has_demographics: false,
    };
}

/// Immutable configuration record for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityConfig {
    pub city: City,
    /// File name relative to the registry's data directory.
    pub file_name: String,
    pub schema: CitySchema,
}

fn city_configs() -> Vec<CityConfig> {
    vec![
        CityConfig {
            city: City::Chicago,
            file_name: "chicago.csv".to_string(),
            schema: CitySchema::WITH_DEMOGRAPHICS,
        },
        CityConfig {
            city: City::NewYorkCity,
            file_name: "new_york_city.csv".to_string(),
            schema: CitySchema::WITH_DEMOGRAPHICS,
        },
        CityConfig {
            city: City::Washington,
            file_name: "washington.csv".to_string(),
            schema: CitySchema::WITHOUT_DEMOGRAPHICS,
        },
    ]
}

/// City → source-file mapping, built once at start-up and never mutated.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    data_dir: PathBuf,
    cities: Vec<CityConfig>,
}

impl CityRegistry {
    /// Registry of the three standard cities rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cities: city_configs(),
        }
    }

    /// Directory the source files are resolved against.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// All registered city configurations.
    pub fn cities(&self) -> &[CityConfig] {
        &self.cities
    }

    /// Configuration for `city`.
    pub fn get(&self, city: City) -> Result<&CityConfig> {
        self.cities
            .iter()
            .find(|c| c.city == city)
            .ok_or_else(|| BikeshareError::UnknownCity(city.as_str().to_string()))
    }

    /// Look a city up by its user-facing name.
    pub fn get_by_name(&self, name: &str) -> Result<&CityConfig> {
        self.get(name.parse::<City>()?)
    }

    /// Full path to `city`'s source file.
    pub fn source_path(&self, city: City) -> Result<PathBuf> {
        Ok(self.data_dir.join(&self.get(city)?.file_name))
    }

    /// Schema capability of `city`.
    pub fn schema(&self, city: City) -> Result<CitySchema> {
        Ok(self.get(city)?.schema)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
