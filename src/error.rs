//! Error types shared by the fetch and transform layers.
//!
//! Configuration problems have their own [`crate::config::ConfigError`].
//!
//! Widgets never let these escape their refresh loop: a failed cycle is
//! logged, reported on the status line, and the previous display is kept.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Payload errors
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed parsing failed: {0}")]
    FeedParse(#[from] rss::Error),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

pub type MirrorResult<T> = Result<T, MirrorError>;
