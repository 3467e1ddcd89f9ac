//! My page: level, statistics, badges and weak kanji

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
};

use super::layout::{hint, panel};
use crate::app::state::AppState;
use crate::progress::badges::ALL_KANJI;
use crate::theme::Theme;

/// Weak kanji listed before the rest are elided
const WEAK_SHOWN: usize = 12;

fn percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "-".to_string(), |r| format!("{:.0}%", r * 100.0))
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [top, bottom] = Layout::vertical([Constraint::Length(4), Constraint::Min(5)]).areas(area);
    let [stats_area, badges_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(bottom);

    let level = state.progress.level_progress();
    let label = match level.next {
        Some(next) => format!("Lv.{}  {} / {} ALT  (あと{})", level.level, level.current, next, level.remaining),
        None => format!("Lv.{}  {} ALT  (MAX)", level.level, level.current),
    };
    let gauge = Gauge::default()
        .block(panel(" レベル ", theme))
        .gauge_style(Style::default().fg(theme.accent_primary).bg(theme.bg_primary))
        .ratio(level.progress.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, top);

    let scores = state.progress.scores();
    let stats = &scores.stats;
    let mut lines = vec![
        Line::from(format!("学習した漢字  {}/{}字", state.progress.studied_count(), ALL_KANJI)),
        Line::from(format!(
            "クイズ  {}/{}問  ({})",
            stats.quiz_correct,
            stats.quiz_total,
            percent(stats.quiz_accuracy())
        )),
        Line::from(format!(
            "パズル  {}/{}問  ({})",
            stats.puzzle_correct,
            stats.puzzle_total,
            percent(stats.puzzle_accuracy())
        )),
        Line::from(format!("最大コンボ  {}", stats.max_combo)),
        Line::from(""),
    ];
    for (grade, grade_stats) in &scores.per_grade {
        lines.push(Line::from(Span::styled(
            format!("小{}  正答率 {}", grade, percent(grade_stats.accuracy())),
            Style::default().fg(theme.fg_muted),
        )));
    }

    lines.push(Line::from(""));
    let weak = scores.weak_by_recency();
    lines.push(Line::from(Span::styled(
        format!("苦手な漢字 ({})", weak.len()),
        Style::default().fg(theme.warning),
    )));
    let shown: Vec<&str> = weak.iter().take(WEAK_SHOWN).map(|(c, _)| *c).collect();
    if !shown.is_empty() {
        let more = if weak.len() > WEAK_SHOWN { " …" } else { "" };
        lines.push(Line::from(format!("{}{}", shown.join(" "), more)));
    }
    if let Some(plan) = state.progress.review_plan() {
        lines.push(Line::from(Span::styled(
            format!("[Enter] {}クイズで復習 ({}字)", plan.quiz_type.label(), plan.kanji.len()),
            Style::default().fg(theme.accent_primary),
        )));
    }
    lines.push(Line::from(""));
    lines.push(hint("[Esc] もどる", theme));

    let block = panel(" きろく ", theme);
    let inner = block.inner(stats_area);
    frame.render_widget(block, stats_area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

    let badges = state.progress.badges();
    let title = format!(" バッジ {}/{} ", badges.unlocked_count(), badges.all().len());
    let block = panel(&title, theme);
    let inner = block.inner(badges_area);
    frame.render_widget(block, badges_area);

    let lines: Vec<Line> = badges
        .all()
        .into_iter()
        .map(|status| match status.unlocked_at {
            Some(_) => Line::from(vec![
                Span::styled(
                    format!("{} {}", status.badge.icon, status.badge.name),
                    Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", status.badge.description),
                    Style::default().fg(theme.fg_muted),
                ),
            ]),
            None => Line::from(Span::styled(
                format!("🔒 ？？？  {}", status.badge.description),
                Style::default().fg(theme.fg_muted),
            )),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
