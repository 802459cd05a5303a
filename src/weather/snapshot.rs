//! OpenWeatherMap "current weather" payload.
//!
//! Only the fields the transform needs are required; everything else the
//! provider sends is ignored.  A payload missing a required field fails to
//! parse, which the widget treats exactly like a failed fetch.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{MirrorError, MirrorResult};

#[derive(Debug, Deserialize)]
struct CurrentWeatherFeed {
    #[serde(default)]
    name: String,
    main: Main,
    wind: Wind,
    weather: Vec<Condition>,
    sys: Sys,
    #[serde(default)]
    clouds: Option<Clouds>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Sys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: f64,
}

/// One fetched observation.  Produced once per poll and discarded after
/// the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Pressure, hPa.
    pub pressure: f64,
    /// Metres per second in metric units, miles per hour in imperial.
    pub wind_speed: f64,
    /// Direction the wind comes from, degrees.
    pub wind_bearing: f64,
    pub condition_code: String,
    pub description: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Cloud cover, percent.
    pub cloudiness: Option<f64>,
}

impl WeatherSnapshot {
    pub fn from_json(body: &str) -> MirrorResult<Self> {
        let feed: CurrentWeatherFeed = serde_json::from_str(body)?;

        let condition = feed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| MirrorError::Payload("empty `weather` array".into()))?;

        Ok(Self {
            location: feed.name,
            temperature: feed.main.temp,
            temp_min: feed.main.temp_min,
            temp_max: feed.main.temp_max,
            humidity: feed.main.humidity,
            pressure: feed.main.pressure,
            wind_speed: feed.wind.speed,
            wind_bearing: feed.wind.deg,
            condition_code: condition.icon,
            description: condition.description,
            sunrise: epoch(feed.sys.sunrise, "sys.sunrise")?,
            sunset: epoch(feed.sys.sunset, "sys.sunset")?,
            cloudiness: feed.clouds.map(|c| c.all),
        })
    }
}

fn epoch(secs: i64, field: &str) -> MirrorResult<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| MirrorError::Payload(format!("`{field}` out of range: {secs}")))
}
