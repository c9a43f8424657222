//! Shared types for the bikeshare explorer: the error taxonomy, trip data
//! model, city registry, cell coercion and display formatting, and the
//! command-line settings.

pub mod cities;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use cities::{City, CityConfig, CityRegistry, CitySchema};
pub use error::{BikeshareError, Result};
