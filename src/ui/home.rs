//! Home screen: title, level and the main menu

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::{centered_rect, hint, menu_lines, panel};
use crate::app::state::{AppState, HomeItem};
use crate::progress::badges::ALL_KANJI;
use crate::theme::Theme;

const TITLE: &str = "漢 字 ス ト ロ ー ク";
const TAGLINE: &str = "書き順をおぼえて、クイズとパズルでレベルアップ！";

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let area = centered_rect(60, 80, area);
    let block = panel(" ホーム ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let level = state.progress.level_progress();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE, Style::default().fg(theme.fg_muted))),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("Lv.{}", level.level), Style::default().fg(theme.accent_secondary)),
            Span::styled(
                format!("  {} ALT", state.progress.total_points()),
                Style::default().fg(theme.fg_primary),
            ),
            Span::styled(
                format!("  {}/{}字", state.progress.studied_count(), ALL_KANJI),
                Style::default().fg(theme.fg_muted),
            ),
        ]),
        Line::from(""),
    ];

    let items: Vec<String> = HomeItem::ALL.iter().map(|i| i.label().to_string()).collect();
    lines.extend(menu_lines(&items, state.cursor, theme));
    lines.push(Line::from(""));
    lines.push(hint("[j/k] えらぶ    [Enter] けってい    [q] おわる", theme));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
