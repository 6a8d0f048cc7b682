//! Ties a [`Geocoder`] and a [`WeatherSource`] together: resolve a place,
//! then ask for the conditions there.

use std::fmt;
use tracing::info;

use crate::{
    Coordinates, CurrentWeatherData, TemperatureUnit,
    error::Result,
    provider::{Geocoder, WeatherSource},
};

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub coordinates: Coordinates,
    pub weather: CurrentWeatherData,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.weather.units.symbol();
        write!(
            f,
            "The temperature is {:.1}{symbol} and it feels like {:.1}{symbol}",
            self.weather.temperature, self.weather.feels_like,
        )
    }
}

/// Conditions at wherever the caller's public IP geolocates to.
pub async fn report_for_ip(
    geocoder: &dyn Geocoder,
    source: &dyn WeatherSource,
    units: TemperatureUnit,
) -> Result<WeatherReport> {
    let coordinates = geocoder.geocode_ip().await?;
    info!(%coordinates, "located caller by IP");
    report_at(source, coordinates, units).await
}

/// Conditions at the first match for a free-text `query`.
pub async fn report_for_query(
    geocoder: &dyn Geocoder,
    source: &dyn WeatherSource,
    query: &str,
    units: TemperatureUnit,
) -> Result<WeatherReport> {
    let coordinates = geocoder.geocode(query).await?;
    info!(%coordinates, query, "located query");
    report_at(source, coordinates, units).await
}

async fn report_at(
    source: &dyn WeatherSource,
    coordinates: Coordinates,
    units: TemperatureUnit,
) -> Result<WeatherReport> {
    let weather = source
        .get_current_weather(coordinates.latitude, coordinates.longitude, units)
        .await?;

    Ok(WeatherReport { coordinates, weather })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, WeatherError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FixedGeocoder(Coordinates);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, query: &str) -> Result<Coordinates> {
            if query.is_empty() {
                return Err(WeatherError::InvalidArgument("query cannot be empty".into()));
            }
            Ok(self.0)
        }

        async fn geocode_ip(&self) -> Result<Coordinates> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Coordinates> {
            Err(WeatherError::missing("geocode response", "no addresses"))
        }

        async fn geocode_ip(&self) -> Result<Coordinates> {
            Err(WeatherError::missing("IP geocode response", "no address"))
        }
    }

    /// Records every call and reports a constant reading.
    #[derive(Debug, Default)]
    struct RecordingSource {
        calls: Mutex<Vec<(f64, f64, TemperatureUnit)>>,
    }

    #[async_trait]
    impl WeatherSource for RecordingSource {
        async fn get_current_weather(
            &self,
            lat: f64,
            lon: f64,
            units: TemperatureUnit,
        ) -> Result<CurrentWeatherData> {
            self.calls.lock().unwrap().push((lat, lon, units));
            Ok(CurrentWeatherData {
                units,
                temperature: 72.5,
                feels_like: 70.1,
                pressure: 1013,
                humidity: 40,
            })
        }
    }

    #[tokio::test]
    async fn ip_report_queries_weather_at_geocoded_point() {
        let geocoder = FixedGeocoder(Coordinates::new(10.0, 20.0));
        let source = RecordingSource::default();

        let report = report_for_ip(&geocoder, &source, TemperatureUnit::Fahrenheit)
            .await
            .unwrap();

        assert_eq!(report.coordinates, Coordinates::new(10.0, 20.0));
        assert_eq!(report.weather.units, TemperatureUnit::Fahrenheit);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![(10.0, 20.0, TemperatureUnit::Fahrenheit)]
        );
    }

    #[tokio::test]
    async fn query_report_uses_forward_geocoding() {
        let geocoder = FixedGeocoder(Coordinates::new(48.85, 2.35));
        let source = RecordingSource::default();

        let report = report_for_query(&geocoder, &source, "Paris", TemperatureUnit::Celsius)
            .await
            .unwrap();

        assert_eq!(report.weather.units, TemperatureUnit::Celsius);
        assert_eq!(source.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_query_skips_weather_call() {
        let geocoder = FixedGeocoder(Coordinates::new(0.0, 0.0));
        let source = RecordingSource::default();

        let err = report_for_query(&geocoder, &source, "", TemperatureUnit::Celsius)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn geocoder_failure_is_propagated() {
        let source = RecordingSource::default();

        let err = report_for_ip(&FailingGeocoder, &source, TemperatureUnit::Kelvin)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn report_line_format() {
        let report = WeatherReport {
            coordinates: Coordinates::new(40.0, -73.0),
            weather: CurrentWeatherData {
                units: TemperatureUnit::Fahrenheit,
                temperature: 72.5,
                feels_like: 70.1,
                pressure: 1013,
                humidity: 40,
            },
        };

        assert_eq!(
            report.to_string(),
            "The temperature is 72.5°F and it feels like 70.1°F"
        );
    }
}
