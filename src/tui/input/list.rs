use crossterm::event::{KeyCode, KeyEvent};

use crate::model::entry::Field;
use crate::tui::app::App;

pub(super) fn handle_list(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.list.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.list.select_next(),
        KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => app.remove_selected(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.focus_field(Field::Time),
        _ => {}
    }
}
