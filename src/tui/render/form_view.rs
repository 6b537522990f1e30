use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::entry::Field;
use crate::tui::app::App;
use crate::util::unicode::{byte_offset_to_display_col, display_width, truncate_to_width};

/// Width of the label column, including the trailing ": "
const LABEL_WIDTH: u16 = 14;

/// Screen area of one field's value, inside the form block.
pub fn field_value_area(form_area: Rect, field: Field) -> Rect {
    let row = Field::ALL.iter().position(|&f| f == field).unwrap_or(0) as u16;
    let inner_x = form_area.x + 1;
    let inner_w = form_area.width.saturating_sub(2);
    Rect::new(
        inner_x + LABEL_WIDTH.min(inner_w),
        form_area.y + 1 + row,
        inner_w.saturating_sub(LABEL_WIDTH),
        1,
    )
}

/// Render the entry form: one labelled row per field
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let focused = app.focused_field();

    let border_color = if focused.is_some() {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " New entry ",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border_color).bg(bg))
        .style(Style::default().bg(bg));

    let value_width = area.width.saturating_sub(2 + LABEL_WIDTH) as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        let is_focused = focused == Some(field);
        let label_color = if app.form.is_invalid(field) {
            app.theme.red
        } else if is_focused {
            app.theme.highlight
        } else {
            app.theme.dim
        };
        let mut label_style = Style::default().fg(label_color).bg(bg);
        if is_focused {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }

        let value = app.form.value(field);
        let value_style = Style::default()
            .fg(if is_focused {
                app.theme.text_bright
            } else {
                app.theme.text
            })
            .bg(bg);

        let label = format!(
            "{:<width$}",
            format!("{}:", field.label()),
            width = LABEL_WIDTH as usize
        );
        let mut spans = vec![
            Span::styled(label, label_style),
            Span::styled(truncate_to_width(value, value_width), value_style),
        ];
        if field == Field::Time && !value.is_empty() && display_width(value) + 2 < value_width {
            spans.push(Span::styled(" h", Style::default().fg(app.theme.dim).bg(bg)));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Terminal cursor inside the focused field
    if let Some(field) = focused {
        let input = app.form.input(field);
        let value_area = field_value_area(area, field);
        let col = byte_offset_to_display_col(&input.value, input.cursor) as u16;
        if value_area.width > 0 {
            frame.set_cursor_position((
                value_area.x + col.min(value_area.width - 1),
                value_area.y,
            ));
        }
    }
}
