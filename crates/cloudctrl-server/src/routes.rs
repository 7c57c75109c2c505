//! HTTP routes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use cloudctrl_weather::{Payload, WeatherParams, WeatherSummary};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /api/weather`: the payload, flagged when served from cache.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    #[serde(rename = "fromCache", skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
    #[serde(flatten)]
    pub payload: Arc<Payload>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(get_weather))
        .route("/api/weather/summary", get(get_summary))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// `GET /api/weather?query=London&units=metric`
/// or `GET /api/weather?lat=12.97&lon=77.59&units=metric`
async fn get_weather(
    State(state): State<AppState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let Query(params) = params?;
    tracing::debug!("GET /api/weather {:?}", params);
    let fetched = state.weather.fetch_params(params).await?;

    Ok(Json(WeatherResponse {
        from_cache: fetched.from_cache,
        payload: fetched.payload,
    }))
}

/// `GET /api/weather/summary`, same parameters: hourly and daily views.
async fn get_summary(
    State(state): State<AppState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<WeatherSummary>, ApiError> {
    let Query(params) = params?;
    tracing::debug!("GET /api/weather/summary {:?}", params);
    let query = params.into_query()?;
    let summary = state.weather.summary(&query).await?;
    Ok(Json(summary))
}

/// One line per request. The query string is left out.
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        "{}",
        access_line(&method, &path, response.status(), started.elapsed())
    );
    response
}

fn access_line(method: &Method, path: &str, status: StatusCode, elapsed: Duration) -> String {
    format!(
        "{} {} {} {:.3} ms",
        method,
        path,
        status.as_u16(),
        elapsed.as_secs_f64() * 1000.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_line_format() {
        let line = access_line(
            &Method::GET,
            "/api/weather",
            StatusCode::OK,
            Duration::from_micros(12_345),
        );
        assert_eq!(line, "GET /api/weather 200 12.345 ms");
    }

    #[test]
    fn test_access_line_reports_error_status() {
        let line = access_line(
            &Method::GET,
            "/api/weather/summary",
            StatusCode::BAD_REQUEST,
            Duration::ZERO,
        );
        assert_eq!(line, "GET /api/weather/summary 400 0.000 ms");
    }
}
