//! Digital clock widget.

use std::time::Duration;

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ConfigError, Configuration, Position};
use crate::display::{self, DisplayUpdate, DisplaySink, Publisher, WidgetKind};
use crate::scheduler::{Bind, Widget};

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";
pub const DEFAULT_DATE_FORMAT: &str = "%A, %-d %B %Y";

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClockAttributes {
    #[serde(default)]
    time_format: String,
    #[serde(default)]
    custom_time_format: Option<String>,
    #[serde(default)]
    date_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockView {
    pub time: String,
    pub seconds: String,
    pub date: String,
}

/// Resolve a named time format.
///
/// `24hr` and `12hr` are built in, `custom` uses the supplied strftime
/// pattern.  Unknown names and unusable patterns fall back to `%H:%M`.
pub fn resolve_time_format(name: &str, custom: Option<&str>) -> String {
    match name {
        "24hr" => "%H:%M".to_string(),
        "12hr" => "%-I:%M %p".to_string(),
        _ if name.eq_ignore_ascii_case("custom") => custom
            .filter(|pattern| is_valid_pattern(pattern))
            .unwrap_or(DEFAULT_TIME_FORMAT)
            .to_string(),
        _ => DEFAULT_TIME_FORMAT.to_string(),
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

pub struct DigitalClock {
    time_format: String,
    date_format: String,
    view: Publisher<ClockView>,
    placement: Publisher<Position>,
    sink: DisplaySink,
}

impl DigitalClock {
    pub fn new(sink: DisplaySink) -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            view: Publisher::new(sink.clone(), DisplayUpdate::Clock),
            placement: display::placement_publisher(sink.clone(), WidgetKind::Clock),
            sink,
        }
    }

    pub fn render<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> ClockView
    where
        Tz::Offset: std::fmt::Display,
    {
        ClockView {
            time: at.format(&self.time_format).to_string(),
            seconds: at.format("%S").to_string(),
            date: at.format(&self.date_format).to_string(),
        }
    }
}

impl Bind for DigitalClock {
    fn name(&self) -> &'static str {
        WidgetKind::Clock.module_name()
    }

    fn bind(&mut self, config: &Configuration) {
        let parsed = match config.module::<ClockAttributes>(self.name()) {
            Ok(parsed) => parsed,
            Err(ConfigError::Missing(_)) => {
                debug!(widget = self.name(), "no configuration block");
                return;
            }
            Err(e) => {
                warn!(widget = self.name(), error = %e, "ignoring configuration");
                display::report(&self.sink, WidgetKind::Clock, &e);
                return;
            }
        };

        let attrs = parsed.attributes;
        self.time_format =
            resolve_time_format(&attrs.time_format, attrs.custom_time_format.as_deref());
        self.date_format = attrs
            .date_format
            .filter(|pattern| is_valid_pattern(pattern))
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());

        self.placement.publish(parsed.position);
    }
}

#[async_trait]
impl Widget for DigitalClock {
    fn first_delay(&self) -> Duration {
        Duration::ZERO
    }

    async fn tick(&mut self) -> Duration {
        let view = self.render(&Local::now());
        self.view.publish(view);
        TICK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::sync::mpsc;

    fn clock_with(config: &str) -> DigitalClock {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut clock = DigitalClock::new(tx);
        clock.bind(&Configuration::from_json_str(config).unwrap());
        clock
    }

    #[test]
    fn named_formats() {
        assert_eq!(resolve_time_format("24hr", None), "%H:%M");
        assert_eq!(resolve_time_format("12hr", None), "%-I:%M %p");
        assert_eq!(resolve_time_format("sundial", None), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn custom_format_is_validated() {
        assert_eq!(resolve_time_format("CUSTOM", Some("%H.%M")), "%H.%M");
        assert_eq!(resolve_time_format("custom", Some("%Q")), DEFAULT_TIME_FORMAT);
        assert_eq!(resolve_time_format("custom", None), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn renders_configured_formats() {
        let clock = clock_with(
            r#"[{ "module": "DigitalClock",
                  "attributes": { "timeFormat": "12hr", "dateFormat": "%Y-%m-%d" } }]"#,
        );
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 15, 4, 9).unwrap();
        let view = clock.render(&at);
        assert_eq!(view.time, "3:04 PM");
        assert_eq!(view.seconds, "09");
        assert_eq!(view.date, "2025-03-10");
    }

    #[test]
    fn missing_block_keeps_defaults() {
        let clock = clock_with("[]");
        let at = Utc.with_ymd_and_hms(2025, 3, 10, 7, 30, 0).unwrap();
        let view = clock.render(&at);
        assert_eq!(view.time, "07:30");
        assert_eq!(view.date, "Monday, 10 March 2025");
    }

    #[tokio::test]
    async fn tick_publishes_every_second() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clock = DigitalClock::new(tx);
        assert_eq!(clock.tick().await, Duration::from_secs(1));
        assert!(matches!(rx.try_recv(), Ok(DisplayUpdate::Clock(_))));
    }
}
