//! Shared handler state.

use cloudctrl_core::Config;
use cloudctrl_weather::{AggregationService, OpenWeatherClient};

#[derive(Debug, Clone)]
pub struct AppState {
    pub weather: AggregationService,
}

impl AppState {
    /// Build the service graph from configuration. A missing API key is
    /// allowed here; requests then fail with a configuration error.
    pub fn from_config(config: &Config) -> Self {
        let client = OpenWeatherClient::with_base_url(
            config.provider.api_key().map(str::to_string),
            &config.provider.base_url,
        );

        if !client.has_credential() {
            tracing::warn!("Missing OWM_API_KEY - weather requests will fail");
        }

        Self {
            weather: AggregationService::new(client, config.cache.ttl()),
        }
    }
}
