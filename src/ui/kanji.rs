//! Study screens: grade picker, kanji grid and the stroke-order detail view

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::canvas;
use super::layout::{centered_rect, hint, menu_lines, panel};
use crate::app::actions::LIST_COLUMNS;
use crate::app::state::{AppState, GradePurpose};
use crate::kanji::{KanjiSource, MAX_GRADE, MIN_GRADE};
use crate::progress::badges::GRADE_COUNTS;
use crate::theme::Theme;

pub fn draw_grade_select(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let area = centered_rect(50, 70, area);
    let title = match state.purpose {
        GradePurpose::Study => " 学年をえらぶ ",
        GradePurpose::Quiz => " クイズの学年 ",
    };
    let block = panel(title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<String> = (MIN_GRADE..=MAX_GRADE)
        .map(|grade| {
            let total = GRADE_COUNTS.iter().find(|(g, _)| *g == grade).map_or(0, |(_, n)| *n);
            format!("小{}  {:>3}/{}字", grade, state.progress.studied_in_grade(grade), total)
        })
        .collect();

    let mut lines = vec![Line::from("")];
    lines.extend(menu_lines(&items, state.cursor, theme));
    lines.push(Line::from(""));
    lines.push(hint("[j/k] えらぶ    [Enter] けってい    [Esc] もどる", theme));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_list(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let characters: Vec<String> = match state.source.grade(state.grade) {
        Ok(list) => list.iter().map(|k| k.character.clone()).collect(),
        Err(_) => Vec::new(),
    };

    let title = format!(" 小{}の漢字 ", state.grade);
    let block = panel(&title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    for (row, chunk) in characters.chunks(LIST_COLUMNS).enumerate() {
        let spans: Vec<Span> = chunk
            .iter()
            .enumerate()
            .flat_map(|(col, character)| {
                let index = row * LIST_COLUMNS + col;
                let mut style = if state.progress.is_studied(character) {
                    Style::default().fg(theme.success)
                } else {
                    Style::default().fg(theme.fg_primary)
                };
                if index == state.cursor {
                    style = style.bg(theme.selection).add_modifier(Modifier::BOLD);
                }
                [Span::styled(format!(" {} ", character), style), Span::raw(" ")]
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(hint("[hjkl] えらぶ    [Enter] 書き順を見る    [Esc] もどる", theme));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_detail(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(record) = &state.kanji else {
        return;
    };
    let [canvas_area, info_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

    let title = format!(" {} ", record.character);
    let sketch = canvas::animator_sketch(&state.animator, theme);
    canvas::draw(frame, canvas_area, panel(&title, theme), &sketch, theme);

    let anim = state.animator.state();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("「{}」  小{}  {}画", record.character, record.grade, record.stroke_count),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("よみ  ", Style::default().fg(theme.fg_muted)),
            Span::styled(record.reading_line(), Style::default().fg(theme.fg_primary)),
        ]),
        Line::from(vec![
            Span::styled("いみ  ", Style::default().fg(theme.fg_muted)),
            Span::styled(record.meaning.clone(), Style::default().fg(theme.fg_primary)),
        ]),
    ];
    if let Some(formation) = record.formation.as_ref().filter(|f| !f.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("なりたち  ", Style::default().fg(theme.fg_muted)),
            Span::styled(
                format!("{} {}", formation.kind, formation.description),
                Style::default().fg(theme.fg_primary),
            ),
        ]));
    }

    lines.push(Line::from(""));
    let progress_style = if anim.is_complete {
        Style::default().fg(theme.success)
    } else {
        Style::default().fg(theme.accent_primary)
    };
    lines.push(Line::from(Span::styled(
        format!("{} / {} 画", anim.current_stroke, anim.total_strokes),
        progress_style,
    )));
    if state.animator.is_auto_playing() {
        lines.push(Line::from(Span::styled("▶ 自動再生中", Style::default().fg(theme.info))));
    }
    lines.push(Line::from(""));
    lines.push(hint("[Space] 1画すすむ  [a] 自動再生  [r] はじめから", theme));
    lines.push(hint("[h/l] まえ/つぎの漢字  [Esc] もどる", theme));

    let block = panel(" くわしく ", theme);
    let inner = block.inner(info_area);
    frame.render_widget(block, info_area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
