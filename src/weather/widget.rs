//! The current-weather widget: configuration binding and refresh cycle.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::snapshot::WeatherSnapshot;
use super::tables::glyph;
use super::transform::transform;
use super::DisplayWeather;
use crate::config::{ConfigError, Configuration, Position};
use crate::display::{self, DisplayUpdate, DisplaySink, Publisher, WidgetKind};
use crate::error::MirrorResult;
use crate::scheduler::{Bind, Widget};
use crate::secret::resolve_api_key;
use crate::source::HttpFetch;

const DEFAULT_REFRESH_MINUTES: u64 = 30;
const MAX_REFRESH_MINUTES: u64 = 24 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherAttributes {
    open_weather_map: OpenWeatherMap,
    #[serde(default = "default_refresh_minutes")]
    refresh_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenWeatherMap {
    key: String,
    location_id: String,
    units: String,
    uri: String,
    #[serde(default = "default_key_directory")]
    key_directory: PathBuf,
}

fn default_refresh_minutes() -> u64 {
    DEFAULT_REFRESH_MINUTES
}

fn default_key_directory() -> PathBuf {
    PathBuf::from("keys")
}

/// What the UI shows for the weather widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    /// Degrees Celsius or Fahrenheit glyph, chosen from the configured units.
    pub unit_glyph: char,
    /// `None` until the first successful fetch.
    pub weather: Option<DisplayWeather>,
}

pub struct WeatherWidget {
    http: Box<dyn HttpFetch>,
    endpoint: Option<String>,
    refresh: Duration,
    unit_glyph: char,
    current: Option<DisplayWeather>,
    view: Publisher<WeatherView>,
    placement: Publisher<Position>,
    sink: DisplaySink,
}

impl WeatherWidget {
    pub fn new(http: Box<dyn HttpFetch>, sink: DisplaySink) -> Self {
        Self {
            http,
            endpoint: None,
            refresh: Duration::from_secs(DEFAULT_REFRESH_MINUTES * 60),
            unit_glyph: glyph::CELSIUS,
            current: None,
            view: Publisher::new(sink.clone(), DisplayUpdate::Weather),
            placement: display::placement_publisher(sink.clone(), WidgetKind::Weather),
            sink,
        }
    }

    async fn fetch(&self, endpoint: &str) -> MirrorResult<DisplayWeather> {
        let body = self.http.get_text(endpoint).await?;
        let snapshot = WeatherSnapshot::from_json(&body)?;
        Ok(transform(&snapshot))
    }

    fn publish(&mut self) {
        self.view.publish(WeatherView {
            unit_glyph: self.unit_glyph,
            weather: self.current.clone(),
        });
    }
}

/// `<uri>/?id=<location>&units=<units>&APPID=<key>`.
fn endpoint(owm: &OpenWeatherMap, key: &str) -> String {
    format!(
        "{}/?id={}&units={}&APPID={}",
        owm.uri.trim_end_matches('/'),
        owm.location_id,
        owm.units,
        key
    )
}

pub fn unit_glyph(units: &str) -> char {
    if units.eq_ignore_ascii_case("metric") {
        glyph::CELSIUS
    } else {
        glyph::FAHRENHEIT
    }
}

impl Bind for WeatherWidget {
    fn name(&self) -> &'static str {
        WidgetKind::Weather.module_name()
    }

    fn bind(&mut self, config: &Configuration) {
        let parsed = match config.module::<WeatherAttributes>(self.name()) {
            Ok(parsed) => parsed,
            Err(ConfigError::Missing(_)) => {
                debug!(widget = self.name(), "no configuration block");
                return;
            }
            Err(e) => {
                warn!(widget = self.name(), error = %e, "ignoring configuration");
                display::report(&self.sink, WidgetKind::Weather, &e);
                return;
            }
        };

        let owm = &parsed.attributes.open_weather_map;
        let key = resolve_api_key(&owm.key, &owm.key_directory);

        self.endpoint = Some(endpoint(owm, &key));
        self.unit_glyph = unit_glyph(&owm.units);
        let minutes = parsed.attributes.refresh_minutes.clamp(1, MAX_REFRESH_MINUTES);
        self.refresh = Duration::from_secs(minutes * 60);
        info!(
            widget = self.name(),
            location = %owm.location_id,
            units = %owm.units,
            "weather configured"
        );

        self.placement.publish(parsed.position);
        self.publish();
    }
}

#[async_trait]
impl Widget for WeatherWidget {
    fn first_delay(&self) -> Duration {
        Duration::ZERO
    }

    async fn tick(&mut self) -> Duration {
        let Some(endpoint) = self.endpoint.clone() else {
            return self.refresh;
        };

        match self.fetch(&endpoint).await {
            Ok(weather) => {
                debug!(widget = self.name(), summary = %weather.summary, "weather refreshed");
                self.current = Some(weather);
                self.publish();
            }
            Err(e) => {
                warn!(widget = self.name(), error = %e, "weather refresh failed");
                display::report(&self.sink, WidgetKind::Weather, &e);
            }
        }

        self.refresh
    }
}
