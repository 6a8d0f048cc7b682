use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::WeatherError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Temperature unit requested by the caller. Providers convert server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Unspecified,
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Unspecified => "unspecified",
            TemperatureUnit::Kelvin => "kelvin",
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Suffix used when printing a temperature. Unspecified means the
    /// provider's base unit, which is kelvin.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Unspecified | TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "unspecified" => Ok(TemperatureUnit::Unspecified),
            "kelvin" | "k" => Ok(TemperatureUnit::Kelvin),
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(WeatherError::InvalidArgument(format!(
                "Unknown temperature unit '{value}'. Supported units: unspecified, kelvin, celsius, fahrenheit."
            ))),
        }
    }
}

/// Snapshot of current conditions as returned by a [`crate::WeatherSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherData {
    /// Always the unit the caller asked for.
    pub units: TemperatureUnit,
    pub temperature: f32,
    pub feels_like: f32,
    /// Sea-level pressure, hPa.
    pub pressure: i32,
    /// Relative humidity, %.
    pub humidity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn unit_parses_long_and_short_names() {
        assert_eq!("Celsius".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        assert_eq!("f".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!("KELVIN".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Kelvin);
        assert_eq!(
            "unspecified".parse::<TemperatureUnit>().unwrap(),
            TemperatureUnit::Unspecified
        );
    }

    #[test]
    fn unknown_unit_is_invalid_argument() {
        let err = "rankine".parse::<TemperatureUnit>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("rankine"));
        assert!(err.to_string().contains("unspecified, kelvin, celsius, fahrenheit"));
    }

    #[test]
    fn unspecified_prints_as_kelvin() {
        assert_eq!(TemperatureUnit::Unspecified.symbol(), "K");
        assert_eq!(TemperatureUnit::default(), TemperatureUnit::Unspecified);
    }

    #[test]
    fn coordinates_display_is_rounded() {
        let c = Coordinates::new(39.501824, -84.7642624);
        assert_eq!(c.to_string(), "39.5018, -84.7643");
    }
}
