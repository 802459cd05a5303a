//! Per-widget refresh scheduling.
//!
//! Every widget runs in its own task with its own timer, so a slow fetch in
//! one widget never delays another.
//!
//! Within a widget the scheduler is single-flight: the next deadline is only
//! armed after [`Widget::tick`] has returned, so refresh cycles never
//! overlap no matter how long a fetch takes.  Configuration reloads are
//! applied while waiting for the deadline, without moving it, and never in
//! the middle of a tick.

use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::config::reload::ConfigReceiver;
use crate::config::Configuration;

/// Stand-in deadline for delays too large to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Something that re-derives its parameters from the configuration.
pub trait Bind: Send {
    fn name(&self) -> &'static str;

    /// Re-resolve this widget's configuration block.  Must not fail: a
    /// missing or invalid block leaves the widget in its current state.
    fn bind(&mut self, config: &Configuration);
}

/// A widget with a periodic refresh.
#[async_trait]
pub trait Widget: Bind {
    /// Delay before the very first tick.
    fn first_delay(&self) -> Duration;

    /// Run one refresh cycle and return the delay until the next one.
    async fn tick(&mut self) -> Duration;
}

/// Spawn the refresh loop for `widget`.
pub fn spawn<W: Widget + 'static>(widget: W, config: ConfigReceiver) -> JoinHandle<()> {
    tokio::spawn(run(widget, config))
}

/// Spawn a task that only keeps `binding` in step with the configuration.
pub fn spawn_binding<B: Bind + 'static>(
    mut binding: B,
    mut config: ConfigReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let current = config.borrow_and_update().clone();
        binding.bind(&current);
        while config.changed().await.is_ok() {
            let current = config.borrow_and_update().clone();
            debug!(widget = binding.name(), "rebinding configuration");
            binding.bind(&current);
        }
    })
}

async fn run<W: Widget>(mut widget: W, mut config: ConfigReceiver) {
    let current = config.borrow_and_update().clone();
    widget.bind(&current);

    let mut delay = widget.first_delay();
    let mut reloads_open = true;

    loop {
        let deadline = deadline_after(Instant::now(), delay);

        while reloads_open {
            tokio::select! {
                () = sleep_until(deadline) => break,
                changed = config.changed() => {
                    if changed.is_err() {
                        reloads_open = false;
                        break;
                    }
                    let current = config.borrow_and_update().clone();
                    debug!(widget = widget.name(), "rebinding configuration");
                    widget.bind(&current);
                }
            }
        }
        sleep_until(deadline).await;

        delay = widget.tick().await;
    }
}

fn deadline_after(now: Instant, delay: Duration) -> Instant {
    now.checked_add(delay).unwrap_or_else(|| now + FAR_FUTURE)
}
