//! Application state definitions

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::kanji::{DataSource, KanjiRecord, MIN_GRADE};
use crate::progress::{ProgressEvent, ProgressTracker};
use crate::puzzle::{MatchOutcome, PuzzleEngine, PuzzleResult};
use crate::quiz::{AnswerOutcome, QuizEngine, QuizResult};
use crate::stroke::{
    Polyline, RetestLoop, RetestQuestion, Speed, StrokeAnimator, StrokeReviewer,
};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    GradeSelect,
    KanjiList,
    KanjiDetail,
    QuizMenu,
    QuizPlay,
    Review,
    QuizResult,
    PuzzleMenu,
    PuzzlePlay,
    PuzzleResult,
    MyPage,
}

/// Entries of the home menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeItem {
    Study,
    Quiz,
    Puzzle,
    MyPage,
    Quit,
}

impl HomeItem {
    pub const ALL: [HomeItem; 5] =
        [HomeItem::Study, HomeItem::Quiz, HomeItem::Puzzle, HomeItem::MyPage, HomeItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            HomeItem::Study => "書き順をまなぶ",
            HomeItem::Quiz => "漢字クイズ",
            HomeItem::Puzzle => "部首パズル",
            HomeItem::MyPage => "マイページ",
            HomeItem::Quit => "おわる",
        }
    }
}

/// What the grade picker leads to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GradePurpose {
    #[default]
    Study,
    Quiz,
}

/// Rows of the puzzle menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PuzzleField {
    #[default]
    Grade,
    Difficulty,
}

/// How long a toast stays on the status line
pub const TOAST_MS: f64 = 2500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub is_error: bool,
    remaining_ms: f64,
}

/// Queue of transient messages shown one at a time
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    toasts: VecDeque<Toast>,
}

impl StatusLine {
    /// Queue an informational message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.push(msg.into(), false);
    }

    /// Queue an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.push(msg.into(), true);
    }

    /// Queue the message of every progress event
    pub fn push_events(&mut self, events: &[ProgressEvent]) {
        for event in events {
            self.set_message(event.message());
        }
    }

    /// The message currently on screen
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|t| t.text.as_str())
    }

    /// Age the front toast, dropping it once expired
    pub fn tick(&mut self, elapsed_ms: f64) {
        let mut budget = elapsed_ms;
        while let Some(front) = self.toasts.front_mut() {
            if budget < front.remaining_ms {
                front.remaining_ms -= budget;
                break;
            }
            budget -= front.remaining_ms;
            self.toasts.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    fn push(&mut self, text: String, is_error: bool) {
        self.toasts.push_back(Toast { text, is_error, remaining_ms: TOAST_MS });
    }
}

/// Quiz screens: the running session, the last answer and the result
#[derive(Debug, Default)]
pub struct QuizView {
    /// Grade the pool came from; `None` for review quizzes
    pub grade: Option<u8>,
    /// Feedback for the answer just given, until the learner moves on
    pub feedback: Option<AnswerOutcome>,
    pub result: Option<QuizResult>,
}

/// Stroke review and the retest that follows it
#[derive(Debug, Default)]
pub struct ReviewView {
    pub retest: Option<RetestLoop>,
    pub question: Option<RetestQuestion>,
    /// Strokes of the reviewed character, kept for the retest canvas
    pub strokes: Vec<Polyline>,
}

/// Puzzle screens: card selection, last outcome and the result
#[derive(Debug, Default)]
pub struct PuzzleView {
    pub grade: u8,
    pub difficulty: u8,
    pub field: PuzzleField,
    /// First card of a pending pair
    pub first: Option<usize>,
    pub last: Option<MatchOutcome>,
    pub time_left: Option<u32>,
    pub result: Option<PuzzleResult>,
    pub loaded: bool,
}

/// Full application state
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Highlighted row, card or stroke on the current screen
    pub cursor: usize,

    pub purpose: GradePurpose,

    /// Grade being studied or quizzed
    pub grade: u8,

    /// Record open on the detail screen
    pub kanji: Option<KanjiRecord>,
    pub kanji_index: usize,

    pub source: Box<dyn DataSource>,
    pub progress: ProgressTracker,

    pub animator: StrokeAnimator,
    pub quiz: QuizEngine,
    pub quiz_view: QuizView,
    pub reviewer: StrokeReviewer,
    pub review: ReviewView,
    pub review_speed: Speed,
    pub puzzle: PuzzleEngine,
    pub puzzle_view: PuzzleView,

    pub status: StatusLine,

    pub(crate) rng: StdRng,
}

impl AppState {
    pub fn new(config: &Config, source: Box<dyn DataSource>, progress: ProgressTracker) -> Self {
        Self {
            screen: Screen::Home,
            cursor: 0,
            purpose: GradePurpose::Study,
            grade: MIN_GRADE,
            kanji: None,
            kanji_index: 0,
            source,
            progress,
            animator: StrokeAnimator::new(),
            quiz: QuizEngine::new(),
            quiz_view: QuizView::default(),
            reviewer: StrokeReviewer::new(),
            review: ReviewView::default(),
            review_speed: config.review_speed,
            puzzle: PuzzleEngine::new(),
            puzzle_view: PuzzleView {
                difficulty: config.default_puzzle_difficulty,
                ..PuzzleView::default()
            },
            status: StatusLine::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace every random source with seeded ones
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.quiz = QuizEngine::with_seed(seed);
        self.puzzle = PuzzleEngine::with_seed(seed.wrapping_add(1));
        self.rng = StdRng::seed_from_u64(seed.wrapping_add(2));
        self
    }

    /// Switch screens, resetting the cursor
    pub fn go(&mut self, screen: Screen) {
        tracing::debug!(from = ?self.screen, to = ?screen, "Screen change");
        self.screen = screen;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_in_order() {
        let mut status = StatusLine::default();
        status.set_message("first");
        status.set_error("second");
        assert_eq!(status.current().map(|t| t.text.as_str()), Some("first"));

        status.tick(TOAST_MS);
        let current = status.current().unwrap();
        assert_eq!(current.text, "second");
        assert!(current.is_error);

        status.tick(TOAST_MS - 1.0);
        assert_eq!(status.len(), 1);
        status.tick(1.0);
        assert!(status.is_empty());
    }

    #[test]
    fn one_long_tick_clears_several_toasts() {
        let mut status = StatusLine::default();
        status.set_message("a");
        status.set_message("b");
        status.set_message("c");
        status.tick(TOAST_MS * 2.5);
        assert_eq!(status.messages().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn home_menu_ends_with_quit() {
        assert_eq!(HomeItem::ALL.last(), Some(&HomeItem::Quit));
    }
}
