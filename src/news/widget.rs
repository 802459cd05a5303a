//! The news ticker widget.
//!
//! Drives [`FeedRotation`] from the scheduler: each tick fetches when the
//! buffer is empty, then plays one fade-out / swap / fade-in cycle.  The
//! first ticks come quickly until a headline has been shown; after that
//! every cycle re-arms the slower dwell interval.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::rotation::{FeedRotation, TickerPhase};
use super::transition::{Transition, TransitionDriver};
use crate::catalog::Catalog;
use crate::config::{ConfigError, Configuration, NamedUri, Position};
use crate::display::{self, DisplayUpdate, DisplaySink, Publisher, WidgetKind};
use crate::scheduler::{Bind, Widget};
use crate::source::FeedSource;

/// Interval used until the first headline has been displayed.
pub const INITIAL_TICK: Duration = Duration::from_secs(1);

const DEFAULT_DWELL_SECONDS: u64 = 17;
const MAX_DWELL_SECONDS: u64 = 60 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsAttributes {
    #[serde(default)]
    feeds: Vec<NamedUri>,
    #[serde(default)]
    default_feed: String,
    #[serde(default = "default_dwell_seconds")]
    dwell_seconds: u64,
}

fn default_dwell_seconds() -> u64 {
    DEFAULT_DWELL_SECONDS
}

/// What the UI shows for the news ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsView {
    pub visible: bool,
    /// Name of the selected feed.
    pub source: String,
    pub headline: String,
    pub age: String,
    /// Channel title the current headline was published under.
    pub channel: String,
    pub phase: TickerPhase,
}

impl Default for NewsView {
    fn default() -> Self {
        Self {
            visible: true,
            source: String::new(),
            headline: "loading news feed ...".into(),
            age: "... please wait".into(),
            channel: String::new(),
            phase: TickerPhase::Idle,
        }
    }
}

pub struct NewsTicker {
    source: Box<dyn FeedSource>,
    transitions: Box<dyn TransitionDriver>,
    catalog: Catalog,
    selected: Option<NamedUri>,
    rotation: FeedRotation,
    interval: Duration,
    dwell: Duration,
    shown: NewsView,
    view: Publisher<NewsView>,
    placement: Publisher<Position>,
    sink: DisplaySink,
}

impl NewsTicker {
    pub fn new(
        source: Box<dyn FeedSource>,
        transitions: Box<dyn TransitionDriver>,
        sink: DisplaySink,
    ) -> Self {
        let mut ticker = Self {
            source,
            transitions,
            catalog: Catalog::default(),
            selected: None,
            rotation: FeedRotation::new(),
            interval: INITIAL_TICK,
            dwell: Duration::from_secs(DEFAULT_DWELL_SECONDS),
            shown: NewsView::default(),
            view: Publisher::new(sink.clone(), DisplayUpdate::News),
            placement: display::placement_publisher(sink.clone(), WidgetKind::News),
            sink,
        };
        ticker.publish();
        ticker
    }

    fn publish(&mut self) {
        self.shown.phase = self.rotation.phase();
        self.view.publish(self.shown.clone());
    }

    /// Feed to rotate through, if the widget is enabled.
    fn active_feed(&self) -> Option<NamedUri> {
        self.selected.clone().filter(|feed| !feed.name.is_empty())
    }
}

impl Bind for NewsTicker {
    fn name(&self) -> &'static str {
        WidgetKind::News.module_name()
    }

    fn bind(&mut self, config: &Configuration) {
        let parsed = match config.module::<NewsAttributes>(self.name()) {
            Ok(parsed) => parsed,
            Err(ConfigError::Missing(_)) => {
                debug!(widget = self.name(), "no configuration block");
                return;
            }
            Err(e) => {
                warn!(widget = self.name(), error = %e, "ignoring configuration");
                display::report(&self.sink, WidgetKind::News, &e);
                return;
            }
        };

        let attrs = parsed.attributes;
        self.catalog = Catalog::new(attrs.feeds);
        let selected = self.catalog.select(&attrs.default_feed).cloned();

        if selected.as_ref().map(|f| &f.uri) != self.selected.as_ref().map(|f| &f.uri) {
            // A different feed: throw away the old one's entries.
            self.rotation.clear();
        }
        self.selected = selected;
        self.dwell = Duration::from_secs(attrs.dwell_seconds.clamp(1, MAX_DWELL_SECONDS));

        self.shown.visible = self.active_feed().is_some();
        if self.catalog.is_empty() {
            info!(widget = self.name(), "feed catalog empty, widget disabled");
        } else if let Some(feed) = &self.selected {
            info!(widget = self.name(), feed = %feed.name, "news feed selected");
        }

        self.placement.publish(parsed.position);
        self.publish();
    }
}

#[async_trait]
impl Widget for NewsTicker {
    fn first_delay(&self) -> Duration {
        INITIAL_TICK
    }

    async fn tick(&mut self) -> Duration {
        let Some(feed) = self.active_feed() else {
            return self.interval;
        };

        if self.rotation.needs_fetch() {
            self.rotation.begin_fetch();
            self.publish();

            match self.source.retrieve(&feed.uri).await {
                Ok(entries) => {
                    self.rotation.replace(entries);
                    debug!(
                        widget = self.name(),
                        feed = %feed.name,
                        count = self.rotation.len(),
                        "feed fetched"
                    );
                    self.shown.source = feed.name.clone();
                }
                Err(e) => {
                    warn!(
                        widget = self.name(),
                        feed = %feed.name,
                        error = %e,
                        "feed fetch failed"
                    );
                    display::report(&self.sink, WidgetKind::News, &e);
                    self.rotation.fetch_failed();
                    self.publish();
                    return self.interval;
                }
            }
        }

        if !self.rotation.begin_fade_out() {
            // Empty feed: show nothing new and try again next cycle.
            self.publish();
            return self.interval;
        }
        self.publish();
        self.transitions.finished(Transition::FadeOut).await;

        if let Some(headline) = self.rotation.swap(Utc::now()) {
            debug!(widget = self.name(), next = self.rotation.cursor(), "headline swapped");
            self.shown.headline = headline.title;
            self.shown.age = headline.age;
            self.shown.channel = headline.channel;
        }
        self.publish();
        self.transitions.finished(Transition::FadeIn).await;

        self.rotation.settle();
        self.publish();

        self.interval = self.dwell;
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MirrorError, MirrorResult};
    use crate::source::FeedEntry;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    #[derive(Clone, Default)]
    struct FakeFeed {
        responses: Arc<Mutex<VecDeque<MirrorResult<Vec<FeedEntry>>>>>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl FakeFeed {
        fn push(&self, response: MirrorResult<Vec<FeedEntry>>) {
            self.responses.lock().unwrap().push_back(response);
        }

        fn requests(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedSource for FakeFeed {
        async fn retrieve(&self, uri: &str) -> MirrorResult<Vec<FeedEntry>> {
            self.requested.lock().unwrap().push(uri.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    /// Finishes transitions immediately and records their order.
    #[derive(Clone, Default)]
    struct InstantTransitions(Arc<Mutex<Vec<Transition>>>);

    #[async_trait]
    impl TransitionDriver for InstantTransitions {
        async fn finished(&mut self, transition: Transition) {
            self.0.lock().unwrap().push(transition);
        }
    }

    fn entries(titles: &[&str]) -> Vec<FeedEntry> {
        titles
            .iter()
            .map(|t| FeedEntry::new(*t, Some(Utc::now()), "Channel"))
            .collect()
    }

    fn config(feeds: &[(&str, &str)], default_feed: &str) -> Configuration {
        let feeds: Vec<String> = feeds
            .iter()
            .map(|(name, uri)| format!(r#"{{ "name": "{name}", "uri": "{uri}" }}"#))
            .collect();
        Configuration::from_json_str(&format!(
            r#"[{{
                "module": "NewsFeed",
                "position": {{ "verticalAlignment": "bottom" }},
                "attributes": {{ "feeds": [{}], "defaultFeed": "{default_feed}" }}
            }}]"#,
            feeds.join(",")
        ))
        .unwrap()
    }

    struct Harness {
        ticker: NewsTicker,
        feed: FakeFeed,
        transitions: InstantTransitions,
        rx: UnboundedReceiver<DisplayUpdate>,
    }

    fn harness() -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = FakeFeed::default();
        let transitions = InstantTransitions::default();
        let ticker = NewsTicker::new(
            Box::new(feed.clone()),
            Box::new(transitions.clone()),
            tx,
        );
        Harness {
            ticker,
            feed,
            transitions,
            rx,
        }
    }

    fn news_views(rx: &mut UnboundedReceiver<DisplayUpdate>) -> Vec<NewsView> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|u| match u {
                DisplayUpdate::News(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_with_loading_text() {
        let mut h = harness();
        let views = news_views(&mut h.rx);
        assert_eq!(views, vec![NewsView::default()]);
        assert_eq!(views[0].headline, "loading news feed ...");
    }

    #[tokio::test]
    async fn first_cycle_fetches_and_shows_first_entry() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w"), ("Tech", "https://t")], "Tech"));
        h.feed.push(Ok(entries(&["one", "two"])));
        news_views(&mut h.rx);

        let next = h.ticker.tick().await;

        assert_eq!(next, Duration::from_secs(17));
        assert_eq!(h.feed.requests(), vec!["https://t".to_string()]);
        assert_eq!(
            *h.transitions.0.lock().unwrap(),
            vec![Transition::FadeOut, Transition::FadeIn]
        );

        let views = news_views(&mut h.rx);
        let phases: Vec<TickerPhase> = views.iter().map(|v| v.phase).collect();
        assert_eq!(
            phases,
            vec![
                TickerPhase::Fetching,
                TickerPhase::FadingOut,
                TickerPhase::FadingIn,
                TickerPhase::Idle
            ]
        );
        // Old text stays up while fading out; the swap happens after.
        assert_eq!(views[1].headline, "loading news feed ...");
        assert_eq!(views[1].source, "Tech");
        assert_eq!(views[2].headline, "one");
        assert_eq!(views[2].age, "less than a minute ago");
        assert_eq!(views[2].channel, "Channel");
    }

    #[tokio::test]
    async fn fourth_cycle_refetches_after_three_entries() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w")], "World"));
        h.feed.push(Ok(entries(&["a", "b", "c"])));
        h.feed.push(Ok(entries(&["d"])));

        for _ in 0..3 {
            h.ticker.tick().await;
        }
        assert_eq!(h.feed.requests().len(), 1);
        assert!(h.ticker.rotation.needs_fetch());

        h.ticker.tick().await;
        assert_eq!(h.feed.requests().len(), 2);
        assert_eq!(h.ticker.shown.headline, "d");
    }

    #[tokio::test]
    async fn fetch_failure_keeps_fast_interval_and_display() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w")], "World"));
        h.feed.push(Err(MirrorError::Payload("connection reset".into())));
        news_views(&mut h.rx);

        let next = h.ticker.tick().await;

        assert_eq!(next, INITIAL_TICK);
        assert!(h.transitions.0.lock().unwrap().is_empty());
        assert_eq!(h.ticker.shown.headline, "loading news feed ...");
        assert!(h.ticker.rotation.needs_fetch());
    }

    #[tokio::test]
    async fn empty_feed_shows_nothing_and_retries() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w")], "World"));

        let next = h.ticker.tick().await;
        assert_eq!(next, INITIAL_TICK);
        assert!(h.transitions.0.lock().unwrap().is_empty());

        h.ticker.tick().await;
        assert_eq!(h.feed.requests().len(), 2);
    }

    #[tokio::test]
    async fn dwell_interval_persists_after_failure() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w")], "World"));
        h.feed.push(Ok(entries(&["a"])));
        h.feed.push(Err(MirrorError::Payload("timeout".into())));

        assert_eq!(h.ticker.tick().await, Duration::from_secs(17));
        assert_eq!(h.ticker.tick().await, Duration::from_secs(17));
    }

    #[tokio::test]
    async fn oversized_dwell_is_capped_at_an_hour() {
        let mut h = harness();
        let cfg = Configuration::from_json_str(
            r#"[{ "module": "NewsFeed", "attributes": {
                "feeds": [{ "name": "World", "uri": "https://w" }],
                "dwellSeconds": 18446744073709551615 } }]"#,
        )
        .unwrap();
        h.ticker.bind(&cfg);
        h.feed.push(Ok(entries(&["a"])));

        assert_eq!(h.ticker.tick().await, Duration::from_secs(60 * 60));
    }

    #[tokio::test]
    async fn empty_catalog_disables_widget() {
        let mut h = harness();
        h.ticker.bind(&config(&[], "World"));

        let views = news_views(&mut h.rx);
        assert!(!views.last().unwrap().visible);

        h.ticker.tick().await;
        assert!(h.feed.requests().is_empty());
    }

    #[test]
    fn absent_default_selects_first_declared_feed() {
        let mut h = harness();
        h.ticker.bind(&config(&[("Zeta", "https://z"), ("Alpha", "https://a")], "Missing"));
        assert_eq!(h.ticker.selected.as_ref().unwrap().name, "Zeta");
    }

    #[tokio::test]
    async fn switching_feed_on_reload_refetches() {
        let mut h = harness();
        h.ticker.bind(&config(&[("World", "https://w"), ("Tech", "https://t")], "World"));
        h.feed.push(Ok(entries(&["a", "b", "c"])));
        h.ticker.tick().await;

        h.ticker.bind(&config(&[("World", "https://w"), ("Tech", "https://t")], "Tech"));
        h.feed.push(Ok(entries(&["x"])));
        h.ticker.tick().await;

        assert_eq!(
            h.feed.requests(),
            vec!["https://w".to_string(), "https://t".to_string()]
        );
        assert_eq!(h.ticker.shown.source, "Tech");
    }

    #[tokio::test]
    async fn rebinding_same_feed_keeps_buffer() {
        let mut h = harness();
        let cfg = config(&[("World", "https://w")], "World");
        h.ticker.bind(&cfg);
        h.feed.push(Ok(entries(&["a", "b"])));
        h.ticker.tick().await;

        h.ticker.bind(&cfg);
        h.ticker.tick().await;

        assert_eq!(h.feed.requests().len(), 1);
        assert_eq!(h.ticker.shown.headline, "b");
    }
}
