use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    CurrentWeatherData, TemperatureUnit,
    error::{Result, WeatherError},
    provider::http::{build_client, decode, fetch_body},
};

use super::WeatherSource;

pub const OPEN_WEATHER_MAP_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherMapSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherMapSource {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, OPEN_WEATHER_MAP_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(WeatherError::Configuration(
                "OpenWeatherMap API key cannot be empty".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client()?,
        })
    }

    /// OpenWeatherMap's own unit vocabulary. It has no "unspecified", so
    /// that falls back to its base units like kelvin does.
    fn units_param(units: TemperatureUnit) -> &'static str {
        match units {
            TemperatureUnit::Unspecified | TemperatureUnit::Kelvin => "standard",
            TemperatureUnit::Celsius => "metric",
            TemperatureUnit::Fahrenheit => "imperial",
        }
    }
}

/// Query string of the current weather endpoint.
#[derive(Debug, Serialize)]
struct CurrentWeatherQuery<'a> {
    lat: f64,
    lon: f64,
    appid: &'a str,
    /// One of standard, metric or imperial.
    units: &'static str,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    /// Unit depends on the `units` query parameter.
    temp: f32,
    feels_like: f32,
    /// hPa
    pressure: i32,
    /// %
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: Option<OwmMain>,
}

#[async_trait]
impl WeatherSource for OpenWeatherMapSource {
    #[instrument(skip(self))]
    async fn get_current_weather(
        &self,
        lat: f64,
        lon: f64,
        units: TemperatureUnit,
    ) -> Result<CurrentWeatherData> {
        let query = CurrentWeatherQuery {
            lat,
            lon,
            appid: &self.api_key,
            units: Self::units_param(units),
        };

        let url = format!("{}/data/2.5/weather", self.base_url);
        let request = self.http.get(url).query(&query);

        let body = fetch_body(request, "OpenWeatherMap current weather request").await?;
        let parsed: OwmCurrentResponse = decode(&body, "OpenWeatherMap current weather")?;

        let main = parsed.main.ok_or_else(|| {
            WeatherError::missing(
                "OpenWeatherMap current weather response",
                "expected a `main` object with temp, feels_like, pressure and humidity, got none",
            )
        })?;

        debug!(temp = main.temp, feels_like = main.feels_like, "current weather received");

        Ok(CurrentWeatherData {
            units,
            temperature: main.temp,
            feels_like: main.feels_like,
            pressure: main.pressure,
            humidity: main.humidity,
        })
    }
}
