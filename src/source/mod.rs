//! Fetch collaborators.
//!
//! Widgets never talk to the network directly.  They hold boxed trait
//! objects from this module so that the refresh logic can be exercised with
//! in-memory fakes:
//!
//! * [`HttpFetch`]: GET a fully assembled URI and return the body text.
//!   Used by the weather widget.
//! * [`FeedSource`]: retrieve a syndication feed as an ordered list of
//!   [`FeedEntry`] values.  Used by the news ticker.
//!
//! Neither trait enforces a timeout; a hung request only delays the widget
//! that issued it.

mod feed_entry;
mod http;
mod rss;

pub use feed_entry::FeedEntry;
pub use http::HttpClient;
pub use rss::RssSource;

use async_trait::async_trait;

use crate::error::MirrorResult;

/// Plain HTTP GET.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetch `uri` and return the response body.  Non-success statuses are
    /// errors.
    async fn get_text(&self, uri: &str) -> MirrorResult<String>;
}

/// Syndication feed retrieval.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Entries in feed order.  The feed is not re-sorted.
    async fn retrieve(&self, uri: &str) -> MirrorResult<Vec<FeedEntry>>;
}
