//! The news ticker's rotation state machine.
//!
//! ```text
//!            fetch ok, entries            fade-out done
//!  Fetching ──────────────────► FadingOut ─────────────► FadingIn
//!     ▲                             ▲     (swap headline,     │
//!     │ buffer empty                │      advance cursor)    │ fade-in done
//!     │                             │ buffer non-empty        ▼
//!     └─────────────────────────── Idle ◄─────────────────────┘
//! ```
//!
//! The buffer is replaced wholesale on every fetch and cleared once the
//! cursor has walked past the last entry, so each fetched entry is shown
//! exactly once before the feed is fetched again.

use chrono::{DateTime, Utc};

use super::age::relative_age;
use crate::source::FeedEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TickerPhase {
    #[default]
    Idle,
    Fetching,
    FadingOut,
    FadingIn,
}

/// Headline text swapped in at the end of a fade-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    /// Empty when the entry has no publish date.
    pub age: String,
    /// Title of the channel the entry came from.
    pub channel: String,
}

#[derive(Debug, Default)]
pub struct FeedRotation {
    buffer: Vec<FeedEntry>,
    cursor: usize,
    phase: TickerPhase,
}

impl FeedRotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TickerPhase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the next cycle has to fetch before it can rotate.
    pub fn needs_fetch(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn begin_fetch(&mut self) {
        self.phase = TickerPhase::Fetching;
    }

    /// Replace the buffer with freshly fetched entries and rewind.
    pub fn replace(&mut self, entries: Vec<FeedEntry>) {
        self.buffer = entries;
        self.cursor = 0;
        self.phase = TickerPhase::Idle;
    }

    pub fn fetch_failed(&mut self) {
        self.phase = TickerPhase::Idle;
    }

    /// Drop the buffer so the next cycle fetches again.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.phase = TickerPhase::Idle;
    }

    /// Start the exit transition.  Returns `false` (and stays put) when
    /// there is nothing to show.
    pub fn begin_fade_out(&mut self) -> bool {
        if self.buffer.is_empty() {
            return false;
        }
        self.phase = TickerPhase::FadingOut;
        true
    }

    /// Exit transition finished: take the entry under the cursor, advance,
    /// and start the enter transition.
    ///
    /// Returns `None` if called outside `FadingOut`.
    pub fn swap(&mut self, now: DateTime<Utc>) -> Option<Headline> {
        if self.phase != TickerPhase::FadingOut {
            return None;
        }
        let entry = self.buffer.get(self.cursor)?;

        let headline = Headline {
            title: entry.title.clone(),
            age: entry
                .published
                .map(|published| relative_age(published, now))
                .unwrap_or_default(),
            channel: entry.source.clone(),
        };

        self.cursor += 1;
        if self.cursor > self.buffer.len() - 1 {
            self.buffer.clear();
            self.cursor = 0;
        }
        self.phase = TickerPhase::FadingIn;
        Some(headline)
    }

    /// Enter transition finished.
    pub fn settle(&mut self) {
        if self.phase == TickerPhase::FadingIn {
            self.phase = TickerPhase::Idle;
        }
    }
}
