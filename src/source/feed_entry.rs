//! The news item type shared by every feed source.

use chrono::{DateTime, Utc};

/// A single feed entry.  Immutable once fetched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedEntry {
    /// Headline shown by the ticker.
    pub title: String,

    /// Publication timestamp used for the "age" line.
    ///
    /// `None` when the feed omitted the date or it did not parse.
    pub published: Option<DateTime<Utc>>,

    /// Title of the feed the entry came from.
    pub source: String,
}

impl FeedEntry {
    pub fn new(
        title: impl Into<String>,
        published: Option<DateTime<Utc>>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            published,
            source: source.into(),
        }
    }
}
