//! Request plumbing shared by the provider clients.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, WeatherError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|source| WeatherError::Transport {
            context: "Failed to build HTTP client".into(),
            source,
        })
}

/// Send `request`, read the whole body and fail on a non-success status.
/// `what` names the request in error messages, e.g. "Radar IP geocode request".
pub(crate) async fn fetch_body(request: RequestBuilder, what: &str) -> Result<String> {
    let res = request
        .send()
        .await
        .map_err(|source| WeatherError::Transport {
            context: format!("Failed to send {what}"),
            source,
        })?;

    let status = res.status();
    let body = res.text().await.map_err(|source| WeatherError::Transport {
        context: format!("Failed to read {what} response body"),
        source,
    })?;

    debug!(%status, bytes = body.len(), "{what} completed");

    if !status.is_success() {
        return Err(WeatherError::UpstreamStatus {
            context: what.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| WeatherError::Decode {
        context: format!("Failed to parse {what} JSON (body: {})", truncate_body(body)),
        source,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        value: i32,
    }

    #[test]
    fn short_body_is_untouched() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn decode_reports_what_was_received() {
        let err = decode::<Probe>("{\"value\": \"nope\"}", "probe").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Failed to parse probe JSON"));
        assert!(msg.contains("nope"));
    }

    #[test]
    fn decode_accepts_matching_shape() {
        let probe: Probe = decode("{\"value\": 3, \"extra\": true}", "probe").unwrap();
        assert_eq!(probe.value, 3);
    }
}
