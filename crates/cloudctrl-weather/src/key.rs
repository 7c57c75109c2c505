//! Cache keys derived from weather queries.

use serde_json::{Map, Value};

use crate::types::{Location, WeatherQuery};

/// Deterministic cache key for one query + units combination.
///
/// Values are used exactly as given: no case folding, trimming or
/// coordinate rounding, so `London` and `london` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_query(query: &WeatherQuery) -> Self {
        let mut fields = Map::new();
        match &query.location {
            Location::Name(name) => {
                fields.insert("query".to_string(), Value::from(name.as_str()));
            }
            Location::Coordinates(coords) => {
                fields.insert("lat".to_string(), Value::from(coords.lat_text()));
                fields.insert("lon".to_string(), Value::from(coords.lon_text()));
            }
        }
        fields.insert("units".to_string(), Value::from(query.units.as_str()));

        Self(Value::Object(fields).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoordinatePair, Units};

    fn coords(lat: &str, lon: &str) -> WeatherQuery {
        WeatherQuery::by_coordinates(CoordinatePair::parse(lat, lon).unwrap(), Units::Metric)
    }

    #[test]
    fn test_identical_queries_share_a_key() {
        let a = WeatherQuery::by_name("London", Units::Metric);
        let b = WeatherQuery::by_name("London", Units::Metric);
        assert_eq!(CacheKey::from_query(&a), CacheKey::from_query(&b));
    }

    #[test]
    fn test_key_layout() {
        let key = CacheKey::from_query(&WeatherQuery::by_name("London", Units::Imperial));
        assert_eq!(key.as_str(), r#"{"query":"London","units":"imperial"}"#);

        let key = CacheKey::from_query(&coords("12.97", "77.59"));
        assert_eq!(key.as_str(), r#"{"lat":"12.97","lon":"77.59","units":"metric"}"#);
    }

    #[test]
    fn test_case_is_significant() {
        let upper = CacheKey::from_query(&WeatherQuery::by_name("London", Units::Metric));
        let lower = CacheKey::from_query(&WeatherQuery::by_name("london", Units::Metric));
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_whitespace_is_significant() {
        let plain = CacheKey::from_query(&WeatherQuery::by_name("Paris", Units::Metric));
        let padded = CacheKey::from_query(&WeatherQuery::by_name(" Paris ", Units::Metric));
        assert_ne!(plain, padded);
    }

    #[test]
    fn test_units_are_part_of_the_key() {
        let metric = CacheKey::from_query(&WeatherQuery::by_name("Oslo", Units::Metric));
        let imperial = CacheKey::from_query(&WeatherQuery::by_name("Oslo", Units::Imperial));
        assert_ne!(metric, imperial);
    }

    #[test]
    fn test_coordinate_text_is_not_rounded() {
        assert_ne!(
            CacheKey::from_query(&coords("12.97", "77.59")),
            CacheKey::from_query(&coords("12.970", "77.59"))
        );
    }

    #[test]
    fn test_name_never_collides_with_coordinates() {
        let by_name = CacheKey::from_query(&WeatherQuery::by_name("12.97", Units::Metric));
        let by_coords = CacheKey::from_query(&coords("12.97", "77.59"));
        assert_ne!(by_name, by_coords);
    }
}
