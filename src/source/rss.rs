//! RSS feed source.
//!
//! Fetches the feed over HTTP and parses it with the [`rss`] crate.  The
//! parsing half is a pure function so tests can run it on inline XML.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{FeedEntry, FeedSource, HttpClient};
use crate::error::MirrorResult;

/// An RSS 2.0 feed source.
#[derive(Debug, Clone, Default)]
pub struct RssSource {
    http: HttpClient,
}

impl RssSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Convert an already-parsed [`rss::Channel`] into [`FeedEntry`]s, in
    /// document order.  Every entry's source is the channel title.
    pub fn parse_channel(channel: &rss::Channel) -> Vec<FeedEntry> {
        let source = channel.title();

        channel
            .items()
            .iter()
            .map(|item| {
                // Parse RFC-2822 date; gracefully degrade to None on failure.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));

                FeedEntry::new(item.title().unwrap_or("(untitled)"), published, source)
            })
            .collect()
    }
}

#[async_trait]
impl FeedSource for RssSource {
    async fn retrieve(&self, uri: &str) -> MirrorResult<Vec<FeedEntry>> {
        let body = self.http.get_bytes(uri).await?;
        let channel = rss::Channel::read_from(body.as_slice())?;
        Ok(Self::parse_channel(&channel))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
