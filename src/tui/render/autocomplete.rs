use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

use super::form_view::field_value_area;

/// Maximum number of visible entries in the dropdown
const MAX_VISIBLE: usize = 8;

/// Render the suggestion dropdown below the field it completes
pub fn render_autocomplete(frame: &mut Frame, app: &App, form_area: Rect) {
    let (Some(field), matches) = (app.autocomplete.field(), app.autocomplete.matches()) else {
        return;
    };
    if matches.is_empty() || app.focused_field() != Some(field) {
        return;
    }

    let bg = app.theme.background;
    let term_area = frame.area();
    let anchor = field_value_area(form_area, field);

    let count = matches.len().min(MAX_VISIBLE);
    let max_width = matches
        .iter()
        .take(MAX_VISIBLE)
        .map(|s| display_width(s))
        .max()
        .unwrap_or(10)
        + 4;

    let popup_w = (max_width as u16)
        .min(anchor.width.saturating_sub(2))
        .max(12)
        .min(term_area.width);
    let popup_h = (count as u16 + 2).min(term_area.height);

    // Below the field when it fits, otherwise above it
    let y = if anchor.y + 1 + popup_h <= term_area.height {
        anchor.y + 1
    } else {
        anchor.y.saturating_sub(popup_h)
    };
    let x = anchor.x.min(term_area.width.saturating_sub(popup_w));
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    // Scroll window around the active match
    let active = app.autocomplete.active_index();
    let scroll_start = match active {
        Some(i) if i >= MAX_VISIBLE => i + 1 - MAX_VISIBLE,
        _ => 0,
    };

    let label_w = (popup_w as usize).saturating_sub(5);
    let mut lines: Vec<Line> = Vec::new();
    for (i, value) in matches.iter().enumerate().skip(scroll_start).take(MAX_VISIBLE) {
        let is_active = active == Some(i);
        let style = if is_active {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };

        let prefix = if is_active { " \u{25B8} " } else { "   " };
        let label = truncate_to_width(value, label_w);
        let pad = label_w.saturating_sub(display_width(&label));
        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(label, style),
            Span::styled(" ".repeat(pad), style),
        ]));
    }

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines).block(block).style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup_area);
}
