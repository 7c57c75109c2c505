//! Weather aggregation for CloudCtrl
//!
//! Combines OpenWeatherMap current conditions and forecast into one payload,
//! caches it briefly per exact query, and derives hourly/daily views.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod key;
pub mod provider;
pub mod service;
pub mod types;

pub use aggregate::{daily_view, hourly_view};
pub use cache::{CacheStore, DEFAULT_TTL};
pub use error::WeatherError;
pub use key::CacheKey;
pub use provider::OpenWeatherClient;
pub use service::{AggregationService, Fetched, PayloadCache};
pub use types::*;
