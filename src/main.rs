//! mirror-dash: a smart-mirror style dashboard for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌─────────────┐ Arc<Configuration> ┌──────────────┐ DisplayUpdate ┌────────┐ draw() ┌───────┐
//! │ config/     │ ─────────────────► │ scheduler.rs │ ────────────► │ app.rs │ ─────► │ ui.rs │
//! │ reload.rs   │  (watch channel)   │ (one task    │  (channel)    │(state) │        │       │
//! └─────────────┘                    │  per widget) │               └────────┘        └───────┘
//!                                    └──────────────┘                    ▲
//!                                                                        │ handle_key_event()
//!                                                                   ┌──────────┐
//!                                                                   │ input.rs │
//!                                                                   └──────────┘
//! ```
//!
//! * **`config`**: typed module blocks and the hot-reload watcher.
//! * **`scheduler`**: single-flight refresh loop shared by every widget.
//! * **`weather`**, **`news`**, **`clock`**, **`radio`**: the widgets.
//! * **`source/`**: HTTP and RSS collaborators behind traits.
//! * **`display`**: equality-gated publishers feeding the UI channel.
//! * **`app`** / **`ui`** / **`input`**: terminal state, rendering and keys.
//! * **`main`**: wires everything together: logging, runtime, terminal and
//!   the event loop.

mod app;
mod catalog;
mod clock;
mod config;
mod display;
mod error;
mod input;
mod news;
mod radio;
mod scheduler;
mod secret;
mod source;
mod ui;
mod weather;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use clock::DigitalClock;
use config::reload;
use news::{NewsTicker, TimedTransitions};
use radio::RadioPlayer;
use source::{HttpClient, RssSource};
use weather::WeatherWidget;

const DEFAULT_CONFIG_PATH: &str = "mirror.json";
const DEFAULT_LOG_FILE: &str = "mirror-dash.log";
const DEFAULT_LOG_FILTER: &str = "mirror_dash=info";

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Log to a file; the terminal belongs to the dashboard.
///
/// `MIRROR_LOG` takes an `EnvFilter` directive, `MIRROR_LOG_FILE` moves the
/// log file.
fn init_tracing() -> Result<()> {
    let path = std::env::var("MIRROR_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.into());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;

    let filter = EnvFilter::try_from_env("MIRROR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing()?;
    install_panic_hook();

    // -- parse arguments -----------------------------------------------------
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let _enter = runtime.enter();

    // -- configuration and hot reload ----------------------------------------
    let initial = reload::initial(&config_path);
    let (config_tx, config_rx) = watch::channel(Arc::new(initial));
    reload::spawn_watcher(config_path.clone(), config_tx, reload::RELOAD_POLL);

    // -- widgets -------------------------------------------------------------
    let (sink, mut rx) = mpsc::unbounded_channel();
    let http = HttpClient::new();

    scheduler::spawn(DigitalClock::new(sink.clone()), config_rx.clone());
    scheduler::spawn(
        WeatherWidget::new(Box::new(http.clone()), sink.clone()),
        config_rx.clone(),
    );
    scheduler::spawn(
        NewsTicker::new(
            Box::new(RssSource::new(http)),
            Box::new(TimedTransitions::default()),
            sink.clone(),
        ),
        config_rx.clone(),
    );
    scheduler::spawn_binding(RadioPlayer::new(sink), config_rx);

    info!(config = %config_path.display(), "dashboard started");

    // -- terminal setup (Drop restores on exit or panic) ---------------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();
    app.status = format!("Config: {}", config_path.display());

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick), fast enough for the headline fades.
    let tick_rate = Duration::from_millis(100);

    loop {
        let now = Instant::now();
        while let Ok(update) = rx.try_recv() {
            app.apply(update, now);
        }

        guard.terminal.draw(|f| ui::draw(&app, f, now))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    drop(guard);
    info!("dashboard stopped");
    // Widget tasks may be mid-fetch; don't wait on them.
    drop(_enter);
    runtime.shutdown_timeout(Duration::from_millis(250));
    Ok(())
}
