//! Radio station selection.
//!
//! Playback is not handled here; the widget only resolves which station
//! the configuration selects and publishes it.

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{ConfigError, Configuration, NamedUri, Position};
use crate::display::{self, DisplayUpdate, DisplaySink, Publisher, WidgetKind};
use crate::scheduler::Bind;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadioAttributes {
    #[serde(default)]
    stations: Vec<NamedUri>,
    #[serde(default)]
    default_station: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioView {
    /// `None` when no station is configured.
    pub station: Option<NamedUri>,
}

pub struct RadioPlayer {
    view: Publisher<RadioView>,
    placement: Publisher<Position>,
    sink: DisplaySink,
}

impl RadioPlayer {
    pub fn new(sink: DisplaySink) -> Self {
        Self {
            view: Publisher::new(sink.clone(), DisplayUpdate::Radio),
            placement: display::placement_publisher(sink.clone(), WidgetKind::Radio),
            sink,
        }
    }
}

impl Bind for RadioPlayer {
    fn name(&self) -> &'static str {
        WidgetKind::Radio.module_name()
    }

    fn bind(&mut self, config: &Configuration) {
        let parsed = match config.module::<RadioAttributes>(self.name()) {
            Ok(parsed) => parsed,
            Err(ConfigError::Missing(_)) => {
                debug!(widget = self.name(), "no configuration block");
                return;
            }
            Err(e) => {
                warn!(widget = self.name(), error = %e, "ignoring configuration");
                display::report(&self.sink, WidgetKind::Radio, &e);
                return;
            }
        };

        let catalog = Catalog::new(parsed.attributes.stations);
        let station = catalog
            .select(&parsed.attributes.default_station)
            .cloned();
        if let Some(station) = &station {
            info!(widget = self.name(), station = %station.name, "radio station selected");
        }

        self.placement.publish(parsed.position);
        self.view.publish(RadioView { station });
    }
}
