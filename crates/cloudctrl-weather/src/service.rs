//! Weather aggregation: the single entry point into the pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::{daily_view, hourly_view};
use crate::cache::CacheStore;
use crate::error::WeatherError;
use crate::key::CacheKey;
use crate::provider::OpenWeatherClient;
use crate::types::{Location, Payload, WeatherParams, WeatherQuery, WeatherSummary};

/// Shared payload cache.
pub type PayloadCache = CacheStore<Arc<Payload>>;

/// A payload plus where it came from.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub payload: Arc<Payload>,
    pub from_cache: bool,
}

/// Resolves a query against the provider and memoizes the combined payload.
///
/// Concurrent requests for the same key that both miss the cache each go
/// upstream; in-flight fetches are not coalesced.
#[derive(Debug, Clone)]
pub struct AggregationService {
    client: OpenWeatherClient,
    cache: Arc<PayloadCache>,
}

impl AggregationService {
    pub fn new(client: OpenWeatherClient, cache_ttl: Duration) -> Self {
        Self::with_cache(client, Arc::new(CacheStore::new(cache_ttl)))
    }

    pub fn with_cache(client: OpenWeatherClient, cache: Arc<PayloadCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    /// Validate raw request parameters, then [`fetch`](Self::fetch).
    pub async fn fetch_params(&self, params: WeatherParams) -> Result<Fetched, WeatherError> {
        let query = params.into_query()?;
        self.fetch(&query).await
    }

    /// Current conditions and forecast for `query`, from cache when fresh.
    ///
    /// Nothing is cached unless both upstream calls succeed.
    pub async fn fetch(&self, query: &WeatherQuery) -> Result<Fetched, WeatherError> {
        if !self.client.has_credential() {
            return Err(WeatherError::missing_api_key());
        }

        let key = CacheKey::from_query(query);
        if let Some(payload) = self.cache.get(key.as_str()) {
            tracing::debug!("Weather cache hit: {}", key);
            return Ok(Fetched {
                payload,
                from_cache: true,
            });
        }
        tracing::debug!("Weather cache miss: {}", key);

        let current = match &query.location {
            Location::Name(name) => self.client.current_by_name(name, query.units).await?,
            Location::Coordinates(coords) => {
                self.client
                    .current_by_coordinates(coords.lat(), coords.lon(), query.units)
                    .await?
            }
        };

        // The provider's answer is authoritative for place identity.
        let coords = current.coords;
        let forecast = self
            .client
            .forecast_by_coordinates(coords.lat, coords.lon, query.units)
            .await?;

        let payload = Arc::new(Payload {
            city: current.name.clone(),
            country: current.country.clone(),
            coords,
            units: query.units,
            current,
            forecast,
        });

        self.cache.put(key, payload.clone());
        tracing::info!(
            "Fetched weather for {} ({} forecast samples)",
            payload.city,
            payload.forecast.len()
        );

        Ok(Fetched {
            payload,
            from_cache: false,
        })
    }

    /// Hourly and daily views of the payload for `query`.
    pub async fn summary(&self, query: &WeatherQuery) -> Result<WeatherSummary, WeatherError> {
        let fetched = self.fetch(query).await?;
        let payload = &fetched.payload;

        Ok(WeatherSummary {
            from_cache: fetched.from_cache,
            city: payload.city.clone(),
            country: payload.country.clone(),
            units: payload.units,
            hourly: hourly_view(&payload.forecast).to_vec(),
            daily: daily_view(&payload.forecast),
        })
    }
}
