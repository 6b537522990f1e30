use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, Focus};

/// Render the help overlay (F1, or ? from the list)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(60, 80, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(" Key Bindings", header_style)));
    lines.push(Line::from(""));

    // Context-sensitive section first
    match app.focus {
        Focus::Form => {
            lines.push(Line::from(Span::styled(" Form", header_style)));
            add_binding(&mut lines, " Tab/S-Tab", "Next / previous field", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Log the entry", key_style, desc_style);
            add_binding(
                &mut lines,
                " \u{2191}\u{2193}",
                "Date: \u{00B1}1 day  Time: \u{00B1}step",
                key_style,
                desc_style,
            );
            add_binding(&mut lines, " ^A/^E", "Start / end of field", key_style, desc_style);
            lines.push(Line::from(""));

            lines.push(Line::from(Span::styled(" Suggestions", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193}", "Choose a suggestion", key_style, desc_style);
            add_binding(&mut lines, " Enter", "Fill the field", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Close suggestions", key_style, desc_style);
            lines.push(Line::from(""));
        }
        Focus::List => {
            lines.push(Line::from(Span::styled(" Entries", header_style)));
            add_binding(&mut lines, " \u{2191}\u{2193}/jk", "Move cursor", key_style, desc_style);
            add_binding(&mut lines, " d/Del", "Remove entry", key_style, desc_style);
            add_binding(&mut lines, " Esc", "Back to the form", key_style, desc_style);
            lines.push(Line::from(""));
        }
    }

    // Global keys
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, " F1", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+R", "Clear the form, back to today", key_style, desc_style);
    add_binding(&mut lines, " Ctrl+Q/C", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));

    frame.render_widget(paragraph, overlay_area);
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    let key_width = 12;
    let padded_key = format!("{:<width$}", key, width = key_width);
    lines.push(Line::from(vec![
        Span::styled(padded_key, key_style),
        Span::styled(desc, desc_style),
    ]));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use super::*;

    #[test]
    fn form_help_lists_form_keys() {
        let app = empty_app();
        let output = render_to_string(TERM_W, 30, |frame, area| {
            render_help_overlay(frame, &app, area)
        });
        assert!(output.contains("Key Bindings"));
        assert!(output.contains("Log the entry"));
        assert!(!output.contains("Remove entry"));
    }

    #[test]
    fn list_help_lists_list_keys() {
        let mut app = app_with_entries();
        app.focus_list();
        let output = render_to_string(TERM_W, 30, |frame, area| {
            render_help_overlay(frame, &app, area)
        });
        assert!(output.contains("Remove entry"));
        assert!(output.contains("Toggle this help"));
    }
}
