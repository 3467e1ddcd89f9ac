//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::StatusLine;
use crate::theme::Theme;

/// Bordered panel with a title, in the theme's secondary background
pub fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary))
}

/// Menu rows with a marker on the selected one
pub fn menu_lines<'a>(items: &[String], selected: usize, theme: &Theme) -> Vec<Line<'a>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == selected {
                Line::from(Span::styled(
                    format!("\u{25B6} {}", item), // ▶
                    Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(format!("  {}", item), Style::default().fg(theme.fg_secondary)))
            }
        })
        .collect()
}

/// Key hints, muted
pub fn hint<'a>(text: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(text, Style::default().fg(theme.fg_muted)))
}

/// Draw the status line: the current toast, or nothing
pub fn draw_status(frame: &mut Frame, area: Rect, status: &StatusLine, theme: &Theme) {
    let (text, style) = match status.current() {
        Some(toast) if toast.is_error => {
            (toast.text.as_str(), Style::default().fg(theme.error).bg(theme.bg_primary))
        }
        Some(toast) => (toast.text.as_str(), Style::default().fg(theme.success).bg(theme.bg_primary)),
        None => ("", Style::default().bg(theme.bg_primary)),
    };
    frame.render_widget(Paragraph::new(text).style(style).alignment(Alignment::Center), area);
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Largest area inside `r` that renders as a square, given cells twice as tall as wide
pub fn square(r: Rect) -> Rect {
    let width = r.width.min(r.height.saturating_mul(2));
    let height = width / 2;
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
