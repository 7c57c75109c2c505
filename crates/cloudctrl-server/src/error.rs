//! Maps pipeline errors to HTTP responses.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cloudctrl_weather::WeatherError;
use serde_json::json;

/// Error returned by handlers; renders as `{ "error": <message> }`.
#[derive(Debug)]
pub struct ApiError(pub WeatherError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

/// Malformed query strings (e.g. a repeated `query`) are validation errors.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(WeatherError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Weather request failed ({}): {}", self.0.kind(), self.0);
        } else {
            tracing::info!("Rejected weather request: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
