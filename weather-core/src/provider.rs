use crate::{
    Config, Coordinates, CurrentWeatherData, TemperatureUnit,
    error::{Result, WeatherError},
    provider::{openweathermap::OpenWeatherMapSource, radar::RadarGeocoder},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod http;
pub mod openweathermap;
pub mod radar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Radar,
    OpenWeatherMap,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Radar => "radar",
            ProviderId::OpenWeatherMap => "openweathermap",
        }
    }

    /// Environment variable that overrides the stored API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Radar => "RADAR_API_KEY",
            ProviderId::OpenWeatherMap => "OWM_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Radar, ProviderId::OpenWeatherMap]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = WeatherError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "radar" => Ok(ProviderId::Radar),
            "openweathermap" | "owm" => Ok(ProviderId::OpenWeatherMap),
            _ => Err(WeatherError::InvalidArgument(format!(
                "Unknown provider '{value}'. Supported providers: radar, openweathermap."
            ))),
        }
    }
}

/// Resolves a place or the caller's public IP into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Forward-geocode free text. Empty queries are rejected before any request.
    async fn geocode(&self, query: &str) -> Result<Coordinates>;

    /// Geocode the public IP the request originates from.
    async fn geocode_ip(&self) -> Result<Coordinates>;
}

/// Current conditions at a point, converted server-side into `units`.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn get_current_weather(
        &self,
        lat: f64,
        lon: f64,
        units: TemperatureUnit,
    ) -> Result<CurrentWeatherData>;
}

fn required_api_key(config: &Config, id: ProviderId) -> Result<&str> {
    config.provider_api_key(id).ok_or_else(|| {
        WeatherError::Configuration(format!(
            "No API key configured for provider '{id}'.\n\
             Hint: set {} or run `weather configure {id}` and enter your API key.",
            id.env_var()
        ))
    })
}

pub fn geocoder_from_config(config: &Config) -> Result<Box<dyn Geocoder>> {
    let api_key = required_api_key(config, ProviderId::Radar)?;
    Ok(Box::new(RadarGeocoder::new(api_key)?))
}

pub fn weather_source_from_config(config: &Config) -> Result<Box<dyn WeatherSource>> {
    let api_key = required_api_key(config, ProviderId::OpenWeatherMap)?;
    Ok(Box::new(OpenWeatherMapSource::new(api_key)?))
}
