mod form;
mod list;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

use form::handle_form;
use list::handle_list;

/// Handle a key event for whatever currently has focus
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status = None;

    // Global bindings
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c') | KeyCode::Char('q')) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        (m, KeyCode::Char('r')) if m.contains(KeyModifiers::CONTROL) => {
            app.show_help = false;
            app.reset();
            return;
        }
        (_, KeyCode::F(1)) => {
            app.show_help = !app.show_help;
            return;
        }
        _ => {}
    }

    // Help overlay swallows everything else
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        _ => match app.focus {
            Focus::Form => handle_form(app, key),
            Focus::List => handle_list(app, key),
        },
    }
}
