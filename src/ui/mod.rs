//! UI rendering components

pub mod canvas;
pub mod home;
pub mod kanji;
pub mod layout;
pub mod mypage;
pub mod puzzle;
pub mod quiz;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
};

use crate::app::state::{AppState, Screen};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let [main, status] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    match state.screen {
        Screen::Home => home::draw(frame, main, state, theme),
        Screen::GradeSelect => kanji::draw_grade_select(frame, main, state, theme),
        Screen::KanjiList => kanji::draw_list(frame, main, state, theme),
        Screen::KanjiDetail => kanji::draw_detail(frame, main, state, theme),
        Screen::QuizMenu => quiz::draw_menu(frame, main, state, theme),
        Screen::QuizPlay => quiz::draw_question(frame, main, state, theme),
        Screen::Review => quiz::draw_review(frame, main, state, theme),
        Screen::QuizResult => quiz::draw_result(frame, main, state, theme),
        Screen::PuzzleMenu => puzzle::draw_menu(frame, main, state, theme),
        Screen::PuzzlePlay => puzzle::draw_board(frame, main, state, theme),
        Screen::PuzzleResult => puzzle::draw_result(frame, main, state, theme),
        Screen::MyPage => mypage::draw(frame, main, state, theme),
    }

    layout::draw_status(frame, status, &state.status, theme);
}
