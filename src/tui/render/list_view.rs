use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::entry::{Entry, format_hours};
use crate::tui::app::{App, Focus};
use crate::util::unicode::{display_width, truncate_to_width};

/// Width of the hours column
const HOURS_WIDTH: usize = 7;

/// Render the entries logged on the displayed date
pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let has_focus = app.focus == Focus::List;

    let title = format!(
        " {}  {} ",
        app.list.date().format("%a %Y-%m-%d"),
        format_hours(app.list.total_hours())
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(
            Style::default()
                .fg(if has_focus {
                    app.theme.highlight
                } else {
                    app.theme.dim
                })
                .bg(bg),
        )
        .style(Style::default().bg(bg));

    let inner_w = area.width.saturating_sub(2) as usize;
    let inner_h = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = if app.list.shows_placeholder() {
        vec![Line::from(Span::styled(
            " No items",
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        // Keep the selection in view
        let selected = app.list.selected();
        let scroll = if inner_h > 0 && selected >= inner_h {
            selected + 1 - inner_h
        } else {
            0
        };
        app.list
            .rows()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_h)
            .map(|(i, entry)| entry_line(app, entry, inner_w, has_focus && i == selected))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn entry_line<'a>(app: &App, entry: &'a Entry, width: usize, selected: bool) -> Line<'a> {
    let bg = if selected {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut hours_style = Style::default().fg(app.theme.cyan).bg(bg);
    let mut target_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    if selected {
        hours_style = hours_style.add_modifier(Modifier::BOLD);
        target_style = target_style.add_modifier(Modifier::BOLD);
    }

    let hours = format!(" {:>w$} ", format_hours(entry.time), w = HOURS_WIDTH - 2);
    let target = format!("{} / {}", entry.customer, entry.project);
    let used = HOURS_WIDTH + display_width(&target);
    let rest = width.saturating_sub(used + 2);
    let description = truncate_to_width(&entry.description, rest);
    let pad = width.saturating_sub(used + 2 + display_width(&description));

    Line::from(vec![
        Span::styled(hours, hours_style),
        Span::styled(truncate_to_width(&target, width.saturating_sub(HOURS_WIDTH)), target_style),
        Span::styled("  ", desc_style),
        Span::styled(description, desc_style),
        Span::styled(" ".repeat(pad), desc_style),
    ])
}
