//! Weather pipeline error types.

use thiserror::Error;

/// Message returned when a request names no location.
pub const MISSING_LOCATION: &str = "Provide ?query=city or ?lat=..&lon=..";

/// Message returned when the provider credential is not configured.
pub const MISSING_API_KEY: &str = "Server missing OWM_API_KEY";

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The caller's query is unusable. No upstream call was made.
    #[error("{0}")]
    Validation(String),

    /// The service is missing its provider credential. No upstream call was made.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with a non-success status.
    #[error("OWM error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Anything else: transport failures, malformed provider responses.
    #[error("{0}")]
    Unexpected(String),
}

impl WeatherError {
    pub fn missing_location() -> Self {
        Self::Validation(MISSING_LOCATION.to_string())
    }

    pub fn missing_api_key() -> Self {
        Self::Configuration(MISSING_API_KEY.to_string())
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Upstream { .. } => "upstream",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// Whether the caller, rather than the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unexpected(format!("Request to weather provider failed: {}", e.without_url()))
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unexpected(format!("Malformed weather provider response: {}", e))
    }
}
