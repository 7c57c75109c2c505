use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

use crate::error::WeatherError;

/// Unit system requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(WeatherError::Validation(format!(
                "Unsupported units '{}': use metric or imperial",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw request parameters, as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherParams {
    pub query: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl WeatherParams {
    /// Validate into a [`WeatherQuery`]: exactly one of a place name or a
    /// complete coordinate pair must be supplied. Empty values count as absent.
    pub fn into_query(self) -> Result<WeatherQuery, WeatherError> {
        let units = match present(self.units) {
            Some(tag) => tag.parse()?,
            None => Units::default(),
        };

        let location = match (present(self.query), present(self.lat), present(self.lon)) {
            (Some(name), None, None) => Location::Name(name),
            (None, Some(lat), Some(lon)) => Location::Coordinates(CoordinatePair::parse(lat, lon)?),
            (Some(_), _, _) => {
                return Err(WeatherError::Validation(
                    "Provide either ?query=city or ?lat=..&lon=.., not both".to_string(),
                ))
            }
            (None, _, _) => return Err(WeatherError::missing_location()),
        };

        Ok(WeatherQuery { location, units })
    }
}

/// A latitude/longitude pair as supplied by the caller.
///
/// The original text is kept so that cache keys reflect exactly what was
/// asked for: `12.970` and `12.97` are different queries.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatePair {
    lat: f64,
    lon: f64,
    lat_text: String,
    lon_text: String,
}

impl CoordinatePair {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            lat_text: lat.to_string(),
            lon_text: lon.to_string(),
        }
    }

    pub fn parse(lat: impl Into<String>, lon: impl Into<String>) -> Result<Self, WeatherError> {
        let lat_text = lat.into();
        let lon_text = lon.into();
        let lat = parse_degrees(&lat_text, "lat", 90.0)?;
        let lon = parse_degrees(&lon_text, "lon", 180.0)?;
        Ok(Self {
            lat,
            lon,
            lat_text,
            lon_text,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat_text(&self) -> &str {
        &self.lat_text
    }

    pub fn lon_text(&self) -> &str {
        &self.lon_text
    }
}

fn parse_degrees(text: &str, field: &str, limit: f64) -> Result<f64, WeatherError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| WeatherError::Validation(format!("Invalid {}: '{}'", field, text)))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(WeatherError::Validation(format!(
            "{} out of range: {}",
            field, text
        )));
    }
    Ok(value)
}

/// Where the caller wants weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Name(String),
    Coordinates(CoordinatePair),
}

/// A validated weather request
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: Location,
    pub units: Units,
}

impl WeatherQuery {
    pub fn by_name(name: impl Into<String>, units: Units) -> Self {
        Self {
            location: Location::Name(name.into()),
            units,
        }
    }

    pub fn by_coordinates(coords: CoordinatePair, units: Units) -> Self {
        Self {
            location: Location::Coordinates(coords),
            units,
        }
    }
}

/// Resolved geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    coord: Coordinates,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: ApiSys,
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    timezone: i64,
    main: ApiMain,
    #[serde(default)]
    wind: ApiWind,
    #[serde(default)]
    weather: Vec<ApiCondition>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSys {
    country: Option<String>,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ApiWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: Option<String>,
    description: Option<String>,
}

/// Current conditions reported by the provider.
///
/// Serializes as the provider's original object; the typed fields are the
/// subset the service reads.
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub coords: Coordinates,
    pub timestamp: i64,
    pub timezone_offset: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub condition: Option<String>,
    pub description: Option<String>,
    raw: Value,
}

impl CurrentConditions {
    pub fn from_api(raw: Value) -> Result<Self, WeatherError> {
        let api = ApiCurrent::deserialize(&raw)?;
        let primary = api.weather.into_iter().next();
        let (condition, description) = match primary {
            Some(c) => (c.main, c.description),
            None => (None, None),
        };

        Ok(Self {
            name: api.name,
            country: api.sys.country,
            coords: api.coord,
            timestamp: api.dt,
            timezone_offset: api.timezone,
            temperature: api.main.temp,
            feels_like: api.main.feels_like,
            humidity: api.main.humidity,
            wind_speed: api.wind.speed,
            sunrise: api.sys.sunrise,
            sunset: api.sys.sunset,
            condition,
            description,
            raw,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl Serialize for CurrentConditions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    #[serde(default)]
    list: Vec<ApiForecastItem>,
    #[serde(default)]
    city: ApiCity,
}

#[derive(Debug, Default, Deserialize)]
struct ApiCity {
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct ApiForecastItem {
    dt: i64,
    main: ApiForecastMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastMain {
    temp: f64,
}

/// One forecast point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    #[serde(rename = "dt")]
    pub timestamp: i64,
    #[serde(rename = "temp")]
    pub temperature: f64,
    pub condition: Option<String>,
}

impl ForecastSample {
    pub fn new(timestamp: i64, temperature: f64, condition: Option<&str>) -> Self {
        Self {
            timestamp,
            temperature,
            condition: condition.map(str::to_string),
        }
    }
}

/// Forecast samples in provider order, with the location's UTC offset.
///
/// Serializes as the provider's original object.
#[derive(Debug, Clone)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
    pub timezone_offset: i64,
    raw: Value,
}

impl ForecastSeries {
    /// Build a series without a provider document behind it.
    pub fn new(samples: Vec<ForecastSample>, timezone_offset: i64) -> Self {
        Self {
            samples,
            timezone_offset,
            raw: Value::Null,
        }
    }

    pub fn from_api(raw: Value) -> Result<Self, WeatherError> {
        let api = ApiForecast::deserialize(&raw)?;
        let samples = api
            .list
            .into_iter()
            .map(|item| ForecastSample {
                timestamp: item.dt,
                temperature: item.main.temp,
                condition: item.weather.into_iter().next().and_then(|c| c.main),
            })
            .collect();

        Ok(Self {
            samples,
            timezone_offset: api.city.timezone,
            raw,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Serialize for ForecastSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// The unit of caching and of the weather response.
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub coords: Coordinates,
    pub units: Units,
    pub current: CurrentConditions,
    pub forecast: ForecastSeries,
}

/// One calendar day of forecast, in location-local time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    /// e.g. `"Mon, 01 Jan"`
    pub label: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub condition: Option<String>,
}

/// Display-ready view of a payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_cache: bool,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub units: Units,
    pub hourly: Vec<ForecastSample>,
    pub daily: Vec<DailyAggregate>,
}
