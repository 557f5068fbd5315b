//! Layout and rendering for the interactive console.

use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::ConsoleApp;
use crate::modes::highlight_line;

/// Render the whole console.
pub fn render_ui(frame: &mut Frame, app: &ConsoleApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Editor area
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    if app.output.is_visible() {
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_layout[0]);
        render_input_pane(frame, app, panes[0]);
        render_output_pane(frame, app, panes[1]);
    } else {
        render_input_pane(frame, app, main_layout[0]);
    }

    render_status_bar(frame, app, main_layout[1]);

    if app.popup_open() {
        render_language_popup(frame, app);
    }

    if app.show_help {
        render_help_overlay(frame, app);
    }
}

/// The editable script pane, with line numbers and mode highlighting.
fn render_input_pane(frame: &mut Frame, app: &ConsoleApp, area: Rect) {
    let lang = app.selected_language();
    let title = format!("Script · {} [{}]", lang.display_name, app.input.mode());

    let lines = app.input.lines();
    let gutter = lines.len().to_string().len().max(2);
    let (cursor_row, cursor_col) = app.input.cursor();

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = cursor_row.saturating_sub(inner_height.saturating_sub(1));

    let mut content: Vec<Line> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("{:>gutter$} ", i + 1),
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(highlight_line(line, app.current_rules()).spans);
        content.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(Text::from(content))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);

    // Place the terminal cursor inside the pane
    let prefix: String = lines[cursor_row].chars().take(cursor_col).collect();
    let x = area.x + 1 + (gutter as u16) + 1 + prefix.width() as u16;
    let y = area.y + 1 + (cursor_row - scroll) as u16;
    if x < area.x + area.width && y < area.y + area.height {
        frame.set_cursor_position(Position { x, y });
    }
}

/// The read-only transcript pane.
fn render_output_pane(frame: &mut Frame, app: &ConsoleApp, area: Rect) {
    let gutter = app.output.lines().len().to_string().len().max(2);
    let mut content: Vec<Line> = Vec::with_capacity(app.output.lines().len());
    for (i, line) in app.output.lines().iter().enumerate() {
        content.push(Line::from(vec![
            Span::styled(
                format!("{:>gutter$} ", i + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(line.clone()),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(content))
        .block(Block::default().borders(Borders::ALL).title("Result"))
        .scroll((app.output_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &ConsoleApp, area: Rect) {
    let mut spans = Vec::new();
    if app.is_busy() {
        spans.push(Span::styled(
            "● ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(app.status_message.clone()));
    spans.push(Span::styled(
        format!("  {}", app.endpoint()),
        Style::default().fg(Color::Gray),
    ));

    let status = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status, area);
}

fn render_language_popup(frame: &mut Frame, app: &ConsoleApp) {
    let area = centered_rect(40, 40, frame.area());
    frame.render_widget(Clear, area);

    let highlighted = app.popup_selected().unwrap_or(0);
    let mut content = Vec::new();
    for (i, lang) in app.languages().iter().enumerate() {
        let marker = if i == highlighted { "▸ " } else { "  " };
        let style = if i == highlighted {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        content.push(Line::from(vec![
            Span::styled(format!("{marker}{}", lang.display_name), style),
            Span::styled(
                format!("  ({})", lang.code),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let popup = Paragraph::new(Text::from(content))
        .block(Block::default().borders(Borders::ALL).title("Language"))
        .wrap(Wrap { trim: false });
    frame.render_widget(popup, area);
}

fn render_help_overlay(frame: &mut Frame, _app: &ConsoleApp) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let keys = [
        ("Ctrl+E / F5", "execute the script"),
        ("F2", "choose language"),
        ("Ctrl+P / Ctrl+N", "previous / next snippet"),
        ("PageUp / PageDown", "scroll the result"),
        ("Tab", "indent"),
        ("F1", "toggle this help"),
        ("Ctrl+C / Ctrl+Q", "quit"),
    ];

    let mut content = Vec::new();
    for (key, what) in keys {
        content.push(Line::from(vec![
            Span::styled(format!("{key:<18}"), Style::default().fg(Color::Cyan)),
            Span::raw(what),
        ]));
    }

    let help = Paragraph::new(Text::from(content))
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, area);
}

/// A centered sub-rectangle taking the given percentages of the frame.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
