//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoder and weather source abstractions, with Radar and
//!   OpenWeatherMap implementations
//! - Shared domain models (coordinates, units, current conditions)
//! - The report flow that chains a geocoder into a weather source
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;

pub use config::{Config, ProviderConfig};
pub use error::{ErrorKind, WeatherError};
pub use model::{Coordinates, CurrentWeatherData, TemperatureUnit};
pub use provider::{Geocoder, ProviderId, WeatherSource};
pub use report::{WeatherReport, report_for_ip, report_for_query};
