//! OpenWeatherMap client.

use serde_json::Value;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{CurrentConditions, ForecastSeries, Units};

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Thin client over the current-weather and 5 day / 3 hour forecast endpoints.
///
/// Each call is a single GET with `units` and `appid` attached. There are no
/// retries and no timeout beyond the transport default.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current conditions for a free-text place name.
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_name(
        &self,
        name: &str,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        let raw = self.get(CURRENT_PATH, &[("q", name.to_string())], units).await?;
        CurrentConditions::from_api(raw)
    }

    /// Current conditions at a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn current_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let raw = self.get(CURRENT_PATH, &params, units).await?;
        CurrentConditions::from_api(raw)
    }

    /// Forecast samples at a coordinate pair.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<ForecastSeries, WeatherError> {
        let params = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let raw = self.get(FORECAST_PATH, &params, units).await?;
        ForecastSeries::from_api(raw)
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
        units: Units,
    ) -> Result<Value, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(WeatherError::missing_api_key)?;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?} units={}", url, params, units);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("units", units.as_str()), ("appid", api_key)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, WeatherError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Weather provider returned {}", status);
            Err(WeatherError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}
