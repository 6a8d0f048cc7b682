use async_trait::async_trait;
use reqwest::{Client, header::AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Coordinates,
    error::{Result, WeatherError},
    provider::http::{build_client, decode, fetch_body},
};

use super::Geocoder;

pub const RADAR_BASE_URL: &str = "https://api.radar.io";

/// Geocoder backed by Radar's autocomplete and IP geocoding endpoints.
#[derive(Debug, Clone)]
pub struct RadarGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl RadarGeocoder {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, RADAR_BASE_URL)
    }

    /// Same as [`RadarGeocoder::new`] but talking to `base_url` instead of
    /// the public API.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(WeatherError::Configuration(
                "Radar API key cannot be empty".into(),
            ));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RadarAddress {
    latitude: f64,
    longitude: f64,
}

impl From<&RadarAddress> for Coordinates {
    fn from(addr: &RadarAddress) -> Self {
        Coordinates::new(addr.latitude, addr.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct RadarAutocompleteResponse {
    #[serde(default)]
    addresses: Vec<RadarAddress>,
}

#[derive(Debug, Deserialize)]
struct RadarIpResponse {
    address: Option<RadarAddress>,
}

#[async_trait]
impl Geocoder for RadarGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Coordinates> {
        if query.trim().is_empty() {
            return Err(WeatherError::InvalidArgument(
                "Geocode query cannot be empty".into(),
            ));
        }

        let url = format!("{}/v1/search/autocomplete", self.base_url);
        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str())
            .query(&[("query", query), ("limit", "1")]);

        let body = fetch_body(request, "Radar geocode request").await?;
        let parsed: RadarAutocompleteResponse = decode(&body, "Radar geocode")?;

        let coords = parsed
            .addresses
            .first()
            .map(Coordinates::from)
            .ok_or_else(|| {
                WeatherError::missing(
                    "Radar geocode response",
                    format!("expected at least one address for '{query}', got none"),
                )
            })?;

        debug!(%coords, "resolved query");
        Ok(coords)
    }

    #[instrument(skip(self))]
    async fn geocode_ip(&self) -> Result<Coordinates> {
        let url = format!("{}/v1/geocode/ip", self.base_url);
        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.api_key.as_str());

        let body = fetch_body(request, "Radar IP geocode request").await?;
        let parsed: RadarIpResponse = decode(&body, "Radar IP geocode")?;

        let address = parsed.address.ok_or_else(|| {
            WeatherError::missing(
                "Radar IP geocode response",
                "expected an `address` object, got none",
            )
        })?;

        let coords = Coordinates::from(&address);
        debug!(%coords, "resolved caller IP");
        Ok(coords)
    }
}
