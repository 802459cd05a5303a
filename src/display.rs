//! Display updates flowing from widget tasks to the UI thread.
//!
//! Each widget owns one [`Publisher`] per observable value.  A publisher
//! remembers what it last sent and stays silent when the new value is equal,
//! so the UI only hears about real changes.

use tokio::sync::mpsc::UnboundedSender;

use crate::clock::ClockView;
use crate::config::Position;
use crate::news::NewsView;
use crate::radio::RadioView;
use crate::weather::WeatherView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Clock,
    Weather,
    News,
    Radio,
}

impl WidgetKind {
    /// Module name used to look the widget up in the configuration.
    pub fn module_name(self) -> &'static str {
        match self {
            Self::Clock => "DigitalClock",
            Self::Weather => "CurrentWeather",
            Self::News => "NewsFeed",
            Self::Radio => "RadioPlayer",
        }
    }
}

/// Messages sent from widget tasks to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    Clock(ClockView),
    Weather(WeatherView),
    News(NewsView),
    Radio(RadioView),
    Placement {
        widget: WidgetKind,
        position: Position,
    },
    /// Free-text status line, e.g. a fetch failure.
    Status(String),
}

pub type DisplaySink = UnboundedSender<DisplayUpdate>;

/// Equality-gated publisher for one observable value.
pub struct Publisher<T> {
    last: Option<T>,
    sink: DisplaySink,
    wrap: fn(T) -> DisplayUpdate,
}

impl<T: Clone + PartialEq> Publisher<T> {
    pub fn new(sink: DisplaySink, wrap: fn(T) -> DisplayUpdate) -> Self {
        Self {
            last: None,
            sink,
            wrap,
        }
    }

    /// Send `value` if it differs from the last one sent.
    ///
    /// Returns whether an update went out.  A closed channel means the UI
    /// has exited; the value is still recorded so callers need not care.
    pub fn publish(&mut self, value: T) -> bool {
        if self.last.as_ref() == Some(&value) {
            return false;
        }
        self.last = Some(value.clone());
        let _ = self.sink.send((self.wrap)(value));
        true
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

/// Publishes a widget's placement whenever its configuration changes it.
pub fn placement_publisher(sink: DisplaySink, widget: WidgetKind) -> Publisher<Position> {
    // Closures that capture cannot coerce to `fn`, so dispatch on the kind.
    let wrap: fn(Position) -> DisplayUpdate = match widget {
        WidgetKind::Clock => |position| DisplayUpdate::Placement {
            widget: WidgetKind::Clock,
            position,
        },
        WidgetKind::Weather => |position| DisplayUpdate::Placement {
            widget: WidgetKind::Weather,
            position,
        },
        WidgetKind::News => |position| DisplayUpdate::Placement {
            widget: WidgetKind::News,
            position,
        },
        WidgetKind::Radio => |position| DisplayUpdate::Placement {
            widget: WidgetKind::Radio,
            position,
        },
    };
    Publisher::new(sink, wrap)
}

/// Report a recoverable failure on the status line.
pub fn report(sink: &DisplaySink, widget: WidgetKind, message: impl std::fmt::Display) {
    let _ = sink.send(DisplayUpdate::Status(format!(
        "{}: {message}",
        widget.module_name()
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerticalAlignment;
    use tokio::sync::mpsc;

    #[test]
    fn equal_values_are_not_republished() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut publisher = Publisher::new(tx, DisplayUpdate::Status);

        assert!(publisher.publish("a".to_string()));
        assert!(!publisher.publish("a".to_string()));
        assert!(publisher.publish("b".to_string()));

        assert_eq!(rx.try_recv().unwrap(), DisplayUpdate::Status("a".into()));
        assert_eq!(rx.try_recv().unwrap(), DisplayUpdate::Status("b".into()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_after_ui_exit_is_harmless() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut publisher = Publisher::new(tx, DisplayUpdate::Status);
        assert!(publisher.publish("x".to_string()));
        assert_eq!(publisher.last().map(String::as_str), Some("x"));
    }

    #[test]
    fn placement_carries_widget_kind() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut publisher = placement_publisher(tx, WidgetKind::News);
        let position = Position {
            vertical_alignment: VerticalAlignment::Bottom,
            ..Position::default()
        };
        publisher.publish(position);

        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayUpdate::Placement {
                widget: WidgetKind::News,
                position
            }
        );
    }

    #[test]
    fn report_prefixes_module_name() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        report(&tx, WidgetKind::Weather, "HTTP request failed");
        assert_eq!(
            rx.try_recv().unwrap(),
            DisplayUpdate::Status("CurrentWeather: HTTP request failed".into())
        );
    }
}
