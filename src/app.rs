use std::collections::HashMap;
use std::time::Instant;

use crate::clock::ClockView;
use crate::config::Position;
use crate::display::{DisplayUpdate, WidgetKind};
use crate::news::NewsView;
use crate::radio::RadioView;
use crate::weather::WeatherView;

/// Everything the UI thread knows, assembled from [`DisplayUpdate`]s.
pub struct App {
    pub clock: Option<ClockView>,
    pub weather: Option<WeatherView>,
    pub news: NewsView,
    /// When the news ticker entered its current phase; drives the fade.
    pub news_phase_since: Instant,
    pub radio: Option<RadioView>,
    pub placements: HashMap<WidgetKind, Position>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            clock: None,
            weather: None,
            news: NewsView::default(),
            news_phase_since: Instant::now(),
            radio: None,
            placements: HashMap::new(),
            quit: false,
            status: "Starting…".into(),
        }
    }

    pub fn apply(&mut self, update: DisplayUpdate, now: Instant) {
        match update {
            DisplayUpdate::Clock(view) => self.clock = Some(view),
            DisplayUpdate::Weather(view) => self.weather = Some(view),
            DisplayUpdate::News(view) => {
                if view.phase != self.news.phase {
                    self.news_phase_since = now;
                }
                self.news = view;
            }
            DisplayUpdate::Radio(view) => self.radio = Some(view),
            DisplayUpdate::Placement { widget, position } => {
                self.placements.insert(widget, position);
            }
            DisplayUpdate::Status(message) => self.status = message,
        }
    }

    pub fn placement(&self, widget: WidgetKind) -> Position {
        self.placements.get(&widget).copied().unwrap_or_default()
    }
}
