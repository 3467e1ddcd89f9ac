//! Radical puzzle screens

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::layout::{centered_rect, hint, panel};
use crate::app::actions::BOARD_COLUMNS;
use crate::app::state::{AppState, PuzzleField};
use crate::puzzle::time_limit;
use crate::theme::Theme;

fn difficulty_label(difficulty: u8) -> String {
    let stars = "★".repeat(usize::from(difficulty));
    match time_limit(difficulty) {
        Some(seconds) => format!("{}  ({}秒)", stars, seconds),
        None => format!("{}  (時間制限なし)", stars),
    }
}

pub fn draw_menu(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let area = centered_rect(50, 60, area);
    let block = panel(" 部首パズル ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view = &state.puzzle_view;
    let grade = if view.grade == 0 { "すべて".to_string() } else { format!("小{}", view.grade) };
    let row = |label: &str, value: String, field: PuzzleField| {
        let style = if view.field == field {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_secondary)
        };
        Line::from(vec![
            Span::styled(format!("{}  ", label), Style::default().fg(theme.fg_muted)),
            Span::styled(format!("\u{25C0} {} \u{25B6}", value), style), // ◀ ▶
        ])
    };

    let lines = vec![
        Line::from(""),
        Line::from("2つの部品を組み合わせて漢字を作ろう"),
        Line::from(""),
        row("学年", grade, PuzzleField::Grade),
        Line::from(""),
        row("むずかしさ", difficulty_label(view.difficulty), PuzzleField::Difficulty),
        Line::from(""),
        hint("[j/k] 項目    [h/l] かえる    [Enter] スタート    [Esc] もどる", theme),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_board(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(round) = state.puzzle.state() else {
        return;
    };
    let block = panel(" 部首パズル ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let view = &state.puzzle_view;
    let mut header = vec![
        Span::styled(
            format!("{} / {} 完成", round.matched_count, round.total),
            Style::default().fg(theme.fg_primary),
        ),
        Span::styled(format!("   スコア {}", round.score), Style::default().fg(theme.fg_primary)),
    ];
    if round.combo >= 2 {
        header.push(Span::styled(format!("   🔥{}コンボ", round.combo), Style::default().fg(theme.warning)));
    }
    if let Some(left) = view.time_left {
        let style = if left <= 10 {
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.info)
        };
        header.push(Span::styled(format!("   ⏱ {}秒", left), style));
    }

    let mut lines = vec![Line::from(header), Line::from(""), Line::from("")];
    for (row, chunk) in state.puzzle.cards().chunks(BOARD_COLUMNS).enumerate() {
        let spans: Vec<Span> = chunk
            .iter()
            .enumerate()
            .flat_map(|(col, card)| {
                let index = row * BOARD_COLUMNS + col;
                let mut style = if card.matched {
                    Style::default().fg(theme.fg_muted)
                } else if view.first == Some(index) {
                    Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.fg_secondary)
                };
                if index == state.cursor {
                    style = style.bg(theme.selection);
                }
                [Span::styled(format!("［ {} ］", card.text), style), Span::raw("  ")]
            })
            .collect();
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if let Some(last) = &view.last {
        let line = match (&last.answer, &last.hint) {
            (Some(answer), Some(note)) if last.correct => Line::from(vec![
                Span::styled(
                    format!("⭕ {} ", answer),
                    Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
                ),
                Span::styled(note.clone(), Style::default().fg(theme.fg_muted)),
            ]),
            _ => Line::from(Span::styled("✕ その組み合わせはないよ", Style::default().fg(theme.error))),
        };
        lines.push(line);
        lines.push(Line::from(""));
    }
    lines.push(hint("[hjkl] えらぶ    [Enter] 部品をとる    [Esc] やめる", theme));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_result(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(result) = &state.puzzle_view.result else {
        return;
    };
    let area = centered_rect(60, 80, area);
    let block = panel(" けっか ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let headline = if result.is_perfect {
        Span::styled(
            "🎉 パーフェクト！",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("{}/{} 完成", result.correct_count, result.total),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(headline),
        Line::from(""),
        Line::from(format!(
            "スコア {}   ミス {}   最大コンボ {}",
            result.score, result.mistake_count, result.max_combo
        )),
        Line::from(Span::styled(
            if result.bonus_points > 0 {
                format!("+{} ALT (ボーナス {})", result.earned_points, result.bonus_points)
            } else {
                format!("+{} ALT", result.earned_points)
            },
            Style::default().fg(theme.accent_secondary),
        )),
        Line::from(""),
    ];

    if !result.unmatched.is_empty() {
        lines.push(Line::from(Span::styled("のこった漢字", Style::default().fg(theme.warning))));
        for pair in &result.unmatched {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} = {}", pair.answer, pair.parts.join(" + ")),
                    Style::default().fg(theme.fg_secondary),
                ),
                Span::styled(format!("  {}", pair.hint), Style::default().fg(theme.fg_muted)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(hint("[Enter] もう一回    [Esc] もどる", theme));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        inner,
    );
}
