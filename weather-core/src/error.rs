use reqwest::StatusCode;
use thiserror::Error;

/// Broad class of a [`WeatherError`], independent of the provider involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidArgument,
    Upstream,
    Transport,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{context} failed with status {status}: {body}")]
    UpstreamStatus {
        context: String,
        status: StatusCode,
        body: String,
    },

    #[error("{context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {detail}")]
    MissingField { context: String, detail: String },

    #[error("{context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Configuration(_) => ErrorKind::Configuration,
            WeatherError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            WeatherError::UpstreamStatus { .. }
            | WeatherError::Decode { .. }
            | WeatherError::MissingField { .. } => ErrorKind::Upstream,
            WeatherError::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub(crate) fn missing(context: impl Into<String>, detail: impl Into<String>) -> Self {
        WeatherError::MissingField {
            context: context.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = WeatherError::UpstreamStatus {
            context: "Radar IP geocode request".into(),
            status: StatusCode::UNAUTHORIZED,
            body: "{\"meta\":{\"code\":401}}".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Radar IP geocode request"));
        assert!(msg.contains("\"code\":401"));
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn decode_error_is_upstream_and_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = WeatherError::Decode {
            context: "Failed to parse OpenWeatherMap current weather JSON".into(),
            source,
        };

        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_field_is_upstream() {
        let err = WeatherError::missing("OpenWeatherMap response", "expected a `main` object");
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(
            err.to_string(),
            "OpenWeatherMap response: expected a `main` object"
        );
    }
}
