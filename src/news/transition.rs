//! Fade transitions between headlines.
//!
//! The rotation engine only needs to know when a transition has finished.
//! How the fade is drawn is up to the UI, which ramps brightness over
//! [`FADE_DURATION`] from the moment it sees the phase change.

use std::time::Duration;

use async_trait::async_trait;

/// Length of one fade-out or fade-in.
pub const FADE_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    FadeOut,
    FadeIn,
}

/// Source of the "transition finished" signal.
#[async_trait]
pub trait TransitionDriver: Send {
    /// Resolve once `transition` has finished playing.
    async fn finished(&mut self, transition: Transition);
}

/// Completes every transition after a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct TimedTransitions {
    duration: Duration,
}

impl TimedTransitions {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl Default for TimedTransitions {
    fn default() -> Self {
        Self::new(FADE_DURATION)
    }
}

#[async_trait]
impl TransitionDriver for TimedTransitions {
    async fn finished(&mut self, _transition: Transition) {
        tokio::time::sleep(self.duration).await;
    }
}
