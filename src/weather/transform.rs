//! Snapshot → display fields.

use chrono::{DateTime, Local, TimeZone, Utc};

use super::snapshot::WeatherSnapshot;
use super::tables::{condition_glyph, wind_description, Beaufort};

/// Display-ready weather fields.
///
/// Every field is a pure function of one [`WeatherSnapshot`]; a new value
/// is built in full for every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayWeather {
    pub location: String,
    pub temperature: String,
    pub temp_min: String,
    pub temp_max: String,
    pub humidity: String,
    pub pressure: String,
    /// Cloud cover percent, when the provider reported it.
    pub cloudiness: Option<String>,
    pub icon: char,
    pub wind_notes: String,
    /// Heading the wind blows towards, degrees clockwise from north.
    pub wind_rotation: u16,
    pub summary: String,
    pub sunrise: String,
    pub sunset: String,
}

/// Transform using the viewer's local time zone.
pub fn transform(snapshot: &WeatherSnapshot) -> DisplayWeather {
    transform_in(snapshot, &Local)
}

/// Transform with sunrise and sunset rendered in `tz`.
pub fn transform_in<Tz: TimeZone>(snapshot: &WeatherSnapshot, tz: &Tz) -> DisplayWeather
where
    Tz::Offset: std::fmt::Display,
{
    DisplayWeather {
        location: snapshot.location.clone(),
        temperature: whole(snapshot.temperature),
        temp_min: whole(snapshot.temp_min),
        temp_max: whole(snapshot.temp_max),
        humidity: whole(snapshot.humidity),
        pressure: whole(snapshot.pressure),
        cloudiness: snapshot.cloudiness.map(whole),
        icon: condition_glyph(&snapshot.condition_code),
        wind_notes: wind_description(snapshot.wind_speed, snapshot.wind_bearing),
        wind_rotation: wind_rotation(snapshot.wind_bearing),
        summary: summary(&snapshot.description, snapshot.wind_speed),
        sunrise: clock_time(snapshot.sunrise, tz),
        sunset: clock_time(snapshot.sunset, tz),
    }
}

/// Round half away from zero and drop the decimal point.
fn whole(value: f64) -> String {
    // `as` saturates, and a -0.0 from rounding prints as "0".
    format!("{}", value.round() as i64)
}

fn wind_rotation(bearing: f64) -> u16 {
    (bearing + 180.0).round().rem_euclid(360.0) as u16
}

/// `"Light intensity drizzle and gentle breeze"`.
fn summary(description: &str, wind_speed: f64) -> String {
    let lower = description.to_lowercase();
    let mut chars = lower.chars();
    let sentence: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!(
        "{sentence} and {}",
        Beaufort::from_mps(wind_speed).phrase().to_lowercase()
    )
}

fn clock_time<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format("%H:%M").to_string()
}
