//! Keyboard input handling.
//!
//! The dashboard is display-only; the single binding quits.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat).
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if let KeyCode::Char('q') | KeyCode::Esc = key.code {
        app.quit = true;
    }
}
