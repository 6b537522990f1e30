use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::form::FormKey;
use crate::tui::app::App;

/// Translate a terminal key into a form key. Control/Alt chords are not
/// text input.
fn form_key(key: KeyEvent) -> Option<FormKey> {
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
    Some(match key.code {
        KeyCode::Up => FormKey::Up,
        KeyCode::Down => FormKey::Down,
        KeyCode::Left => FormKey::Left,
        KeyCode::Right => FormKey::Right,
        KeyCode::Home => FormKey::Home,
        KeyCode::End => FormKey::End,
        KeyCode::Enter => FormKey::Enter,
        KeyCode::Esc => FormKey::Escape,
        KeyCode::Backspace => FormKey::Backspace,
        KeyCode::Delete => FormKey::Delete,
        // Ctrl+A / Ctrl+E: start / end of field
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => FormKey::Home,
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => FormKey::End,
        KeyCode::Char(c) if !chord => FormKey::Char(c),
        _ => return None,
    })
}

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let Some(key) = form_key(key) else {
        return;
    };
    let result = app.with_form(|form, ctx| form.handle_key(key, ctx));
    app.report_submit(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_chars_are_text() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::SHIFT);
        assert_eq!(form_key(key), Some(FormKey::Char('x')));
    }

    #[test]
    fn ctrl_chords_are_not_text() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(form_key(key), None);
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(form_key(key), Some(FormKey::Home));
    }

    #[test]
    fn function_keys_are_ignored() {
        let key = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(form_key(key), None);
    }
}
