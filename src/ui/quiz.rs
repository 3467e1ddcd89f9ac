//! Quiz screens: type menu, question, stroke review and result

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::canvas;
use super::layout::{centered_rect, hint, menu_lines, panel};
use crate::app::state::AppState;
use crate::quiz::{AnswerOutcome, Question, QuestionBody, QuizType};
use crate::stroke::geometry::parse_strokes;
use crate::stroke::reviewer::PRACTICE_LABEL;
use crate::stroke::{RETEST_REQUIRED, ReviewPhase, Speed};
use crate::theme::Theme;

pub fn draw_menu(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let area = centered_rect(50, 60, area);
    let title = format!(" 小{} クイズ ", state.grade);
    let block = panel(&title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<String> =
        QuizType::ALL.iter().map(|t| format!("{}クイズ", t.label())).collect();
    let mut lines = vec![Line::from("")];
    lines.extend(menu_lines(&items, state.cursor, theme));
    lines.push(Line::from(""));
    lines.push(hint("[j/k] えらぶ    [Enter] スタート    [Esc] もどる", theme));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn draw_question(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (Some(question), Some(quiz)) = (state.quiz.current_question(), state.quiz.state()) else {
        return;
    };

    let title = format!(" {}クイズ ", question.quiz_type.label());
    let block = panel(&title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Line::from(vec![
        Span::styled(
            format!("Q{} / {}", quiz.current_index + 1, quiz.total),
            Style::default().fg(theme.fg_muted),
        ),
        Span::styled(format!("   スコア {}", quiz.score), Style::default().fg(theme.fg_primary)),
        Span::styled(
            if quiz.combo >= 2 { format!("   🔥{}コンボ", quiz.combo) } else { String::new() },
            Style::default().fg(theme.warning),
        ),
    ]);

    let stroke_canvas = !question.paths().is_empty();
    let [text_area, body_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(inner);
    let text = vec![
        header,
        Line::from(""),
        Line::from(Span::styled(
            question.text.clone(),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), text_area);

    let choices_area = if stroke_canvas {
        let [canvas_area, rest] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);
        let strokes = parse_strokes(question.paths());
        let selected = match question.body {
            QuestionBody::StrokeOrder { .. } => state.cursor,
            _ => usize::MAX,
        };
        let sketch = canvas::picker_sketch(&strokes, selected, theme);
        let title = format!(" {} ", question.kanji);
        canvas::draw(frame, canvas_area, panel(&title, theme), &sketch, theme);
        rest
    } else {
        body_area
    };

    let lines = match &state.quiz_view.feedback {
        Some(feedback) => feedback_lines(question, feedback, theme),
        None => choice_lines(question, state.cursor, theme),
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), choices_area);
}

fn choice_lines<'a>(question: &Question, cursor: usize, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from("")];
    match question.body {
        QuestionBody::StrokeOrder { .. } => {
            lines.push(Line::from(Span::styled(
                format!("\u{25B6} {}画目", cursor + 1),
                Style::default().fg(theme.stroke_highlight).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(hint("[h/l] 画をえらぶ    [Enter] こたえる", theme));
        }
        _ => {
            lines.extend(menu_lines(question.choices(), cursor, theme));
            lines.push(Line::from(""));
            lines.push(hint("[j/k] えらぶ    [Enter] こたえる", theme));
        }
    }
    lines.push(hint("[Esc] やめる", theme));
    lines
}

fn feedback_lines<'a>(question: &Question, feedback: &AnswerOutcome, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from("")];
    if feedback.correct {
        lines.push(Line::from(Span::styled(
            "⭕ せいかい！",
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("✕ ざんねん… 正解は {}", feedback.correct_answer),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        feedback.explanation.clone(),
        Style::default().fg(theme.fg_primary),
    )));
    lines.push(Line::from(""));

    let next = if !feedback.correct && question.review_request().is_some() {
        "[Enter] 書き順をたしかめる"
    } else if feedback.is_last {
        "[Enter] けっかを見る"
    } else {
        "[Enter] つぎの問題"
    };
    lines.push(hint(next, theme));
    lines
}

pub fn draw_review(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [canvas_area, info_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
    let block = panel(" ふりかえり ", theme);
    let inner = block.inner(info_area);
    frame.render_widget(block, info_area);

    let character = state.quiz.current_question().map(|q| q.kanji.clone()).unwrap_or_default();
    let title = format!(" {} ", character);

    if let Some(question) = state.review.question {
        let sketch = canvas::picker_sketch(&state.review.strokes, state.cursor, theme);
        canvas::draw(frame, canvas_area, panel(&title, theme), &sketch, theme);

        let lines = vec![
            Line::from(Span::styled(
                format!("「{}」の{}画目はどれ？", character, question.target + 1),
                Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("れんぞく正解 {}/{}", question.correct, RETEST_REQUIRED),
                Style::default().fg(theme.accent_secondary),
            )),
            Line::from(""),
            hint("[h/l] 画をえらぶ    [Enter] こたえる", theme),
            hint("[Esc] つぎの問題へ", theme),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        return;
    }

    let sketch = canvas::reviewer_sketch(&state.reviewer, theme);
    canvas::draw(frame, canvas_area, panel(&title, theme), &sketch, theme);

    let speeds: Vec<Span> = Speed::ALL
        .iter()
        .map(|&speed| {
            let style = if speed == state.reviewer.speed() {
                Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg_muted)
            };
            Span::styled(format!(" {} ", speed.label()), style)
        })
        .collect();

    let mut lines = vec![
        Line::from(Span::styled(
            state.reviewer.instruction(),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(speeds),
        Line::from(""),
    ];
    match state.reviewer.phase() {
        ReviewPhase::Waiting => {
            lines.push(Line::from(Span::styled(
                format!("[Enter] {}", PRACTICE_LABEL),
                Style::default().fg(theme.accent_primary),
            )));
        }
        _ => lines.push(hint("[s] はやさ", theme)),
    }
    lines.push(hint("[Esc] つぎの問題へ", theme));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

pub fn draw_result(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(result) = &state.quiz_view.result else {
        return;
    };
    let area = centered_rect(70, 90, area);
    let block = panel(" けっか ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let headline = if result.is_perfect {
        Span::styled(
            format!("🎉 パーフェクト！ {}/{}", result.correct_count, result.total),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("{}/{} 正解", result.correct_count, result.total),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(headline),
        Line::from(""),
        Line::from(format!(
            "スコア {}   正答率 {:.0}%   最大コンボ {}",
            result.score,
            result.accuracy * 100.0,
            result.max_combo
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

    if !result.mistakes.is_empty() {
        lines.push(Line::from(Span::styled("まちがえた問題", Style::default().fg(theme.error))));
        for mistake in &result.mistakes {
            lines.push(Line::from(vec![
                Span::styled(format!("「{}」 ", mistake.kanji), Style::default().fg(theme.fg_secondary)),
                Span::styled(
                    format!("{} → {}", mistake.given, mistake.correct),
                    Style::default().fg(theme.fg_muted),
                ),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(hint("[Enter] もどる", theme));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        inner,
    );
}
