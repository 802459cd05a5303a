//! News ticker widget.
//!
//! Rotates through the headlines of one selected feed, fading each one out
//! and the next one in, and re-fetches once every entry has been shown.

mod age;
mod rotation;
mod transition;
mod widget;

pub use rotation::TickerPhase;
pub use transition::{TimedTransitions, FADE_DURATION};
pub use widget::{NewsTicker, NewsView};
