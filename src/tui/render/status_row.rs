use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::entry::Field;
use crate::tui::app::{App, StatusMessage};
use crate::util::unicode::{display_width, truncate_to_width};

/// Key hints for whatever currently has focus
fn key_hints(app: &App) -> &'static str {
    if app.autocomplete.is_open() {
        return "\u{2191}\u{2193} choose  Enter fill  Esc close";
    }
    match app.focused_field() {
        Some(Field::Date) => "\u{2191}\u{2193} day  Enter go  Tab next  F1 help",
        Some(Field::Time) => "\u{2191}\u{2193} \u{00B1}step  Enter log  Tab next  F1 help",
        Some(_) => "Enter log  Tab next  ^R reset  F1 help",
        None => "\u{2191}\u{2193} select  d delete  Esc form  ? help",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = match &app.status {
        Some(StatusMessage::Info(msg)) => vec![Span::styled(
            truncate_to_width(&format!(" {}", msg), width),
            Style::default().fg(app.theme.green).bg(bg),
        )],
        Some(StatusMessage::Error(msg)) => vec![Span::styled(
            truncate_to_width(&format!(" {}", msg), width),
            Style::default().fg(app.theme.red).bg(bg),
        )],
        None => Vec::new(),
    };

    if app.show_key_hints {
        let hint = key_hints(app);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(
                format!("{} ", hint),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
