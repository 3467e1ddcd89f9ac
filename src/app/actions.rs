//! Screen handlers: what each action does on each screen

use tracing::{debug, info, warn};

use super::input::Action;
use super::state::{AppState, GradePurpose, HomeItem, PuzzleField, QuizView, ReviewView, Screen};
use crate::kanji::{KanjiSource, MAX_GRADE, MIN_GRADE, PuzzleSource};
use crate::progress::stats::REVIEW_MIN_WEAK;
use crate::puzzle::TimerEvent;
use crate::quiz::{Answer, QuestionBody, QuizType};
use crate::stroke::geometry::parse_strokes;
use crate::stroke::{
    AnimationEvent, RETEST_REQUIRED, RetestLoop, RetestOutcome, ReviewEvent, ReviewRequest, Speed,
};

const GRADE_COUNT: usize = (MAX_GRADE - MIN_GRADE + 1) as usize;

/// Characters per row on the kanji list
pub const LIST_COLUMNS: usize = 10;

/// Cards per row on the puzzle board
pub const BOARD_COLUMNS: usize = 5;

impl AppState {
    /// Apply one input action; returns true when the app should exit
    pub fn handle_action(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return true;
        }
        match self.screen {
            Screen::Home => return self.on_home(action),
            Screen::GradeSelect => self.on_grade_select(action),
            Screen::KanjiList => self.on_kanji_list(action),
            Screen::KanjiDetail => self.on_kanji_detail(action),
            Screen::QuizMenu => self.on_quiz_menu(action),
            Screen::QuizPlay => self.on_quiz_play(action),
            Screen::Review => self.on_review(action),
            Screen::QuizResult => self.on_quiz_result(action),
            Screen::PuzzleMenu => self.on_puzzle_menu(action),
            Screen::PuzzlePlay => self.on_puzzle_play(action),
            Screen::PuzzleResult => self.on_puzzle_result(action),
            Screen::MyPage => self.on_my_page(action),
        }
        false
    }

    /// Advance the running animation or countdown by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.status.tick(elapsed_ms);
        match self.screen {
            Screen::KanjiDetail => {
                for event in self.animator.tick(elapsed_ms) {
                    if event == AnimationEvent::Complete {
                        let character = self.animator.character().to_string();
                        let events = self.progress.complete_animation(&character);
                        self.status.push_events(&events);
                    }
                }
            }
            Screen::Review => {
                for event in self.reviewer.tick(elapsed_ms) {
                    if event == ReviewEvent::ReadyToPractice {
                        debug!(character = self.reviewer.character(), "Review ready to practice");
                    }
                }
            }
            Screen::PuzzlePlay => {
                for event in self.puzzle.tick(elapsed_ms) {
                    match event {
                        TimerEvent::Tick(left) => self.puzzle_view.time_left = Some(left),
                        TimerEvent::TimeUp => {
                            self.puzzle_view.time_left = Some(0);
                            self.status.set_error("時間切れ！");
                            self.finish_puzzle();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Number of kanji in the selected grade, zero when unavailable
    pub fn grade_len(&mut self) -> usize {
        self.source.grade(self.grade).map(|list| list.len()).unwrap_or(0)
    }

    fn move_cursor(&mut self, action: Action, len: usize, columns: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let last = len - 1;
        self.cursor = match action {
            Action::Left => self.cursor.saturating_sub(1),
            Action::Right => (self.cursor + 1).min(last),
            Action::Up => self.cursor.saturating_sub(columns),
            Action::Down => (self.cursor + columns).min(last),
            _ => self.cursor,
        };
    }

    fn on_home(&mut self, action: Action) -> bool {
        match action {
            Action::Up | Action::Down => self.move_cursor(action, HomeItem::ALL.len(), 1),
            Action::Select => match HomeItem::ALL[self.cursor.min(HomeItem::ALL.len() - 1)] {
                HomeItem::Study => self.open_grade_select(GradePurpose::Study),
                HomeItem::Quiz => self.open_grade_select(GradePurpose::Quiz),
                HomeItem::Puzzle => {
                    self.puzzle_view.field = PuzzleField::Grade;
                    self.go(Screen::PuzzleMenu);
                }
                HomeItem::MyPage => self.go(Screen::MyPage),
                HomeItem::Quit => return true,
            },
            _ => {}
        }
        false
    }

    fn go_home(&mut self, item: HomeItem) {
        self.go(Screen::Home);
        self.cursor = HomeItem::ALL.iter().position(|&i| i == item).unwrap_or(0);
    }

    fn open_grade_select(&mut self, purpose: GradePurpose) {
        self.purpose = purpose;
        self.go(Screen::GradeSelect);
        self.cursor = usize::from(self.grade - MIN_GRADE);
    }

    fn on_grade_select(&mut self, action: Action) {
        match action {
            Action::Up | Action::Down => self.move_cursor(action, GRADE_COUNT, 1),
            Action::Select => {
                let grade = MIN_GRADE + self.cursor as u8;
                let available = match self.source.grade(grade) {
                    Ok(list) => !list.is_empty(),
                    Err(e) => {
                        warn!(grade, error = %e, "Grade data unavailable");
                        false
                    }
                };
                if !available {
                    self.status.set_error(format!("小{}の漢字データがありません", grade));
                    return;
                }
                self.grade = grade;
                match self.purpose {
                    GradePurpose::Study => self.go(Screen::KanjiList),
                    GradePurpose::Quiz => self.go(Screen::QuizMenu),
                }
            }
            Action::Back => match self.purpose {
                GradePurpose::Study => self.go_home(HomeItem::Study),
                GradePurpose::Quiz => self.go_home(HomeItem::Quiz),
            },
            _ => {}
        }
    }

    fn on_kanji_list(&mut self, action: Action) {
        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => {
                let len = self.grade_len();
                self.move_cursor(action, len, LIST_COLUMNS);
            }
            Action::Select => self.open_kanji(self.cursor),
            Action::Back => self.open_grade_select(GradePurpose::Study),
            _ => {}
        }
    }

    /// Show one kanji of the current grade on the detail screen
    pub fn open_kanji(&mut self, index: usize) {
        let record = match self.source.grade(self.grade) {
            Ok(list) => list.get(index).cloned(),
            Err(e) => {
                self.status.set_error(e.to_string());
                return;
            }
        };
        let Some(record) = record else {
            return;
        };

        self.animator.load(&record);
        self.animator.take_events();
        let events = self.progress.mark_studied(&record.character, record.grade);
        self.status.push_events(&events);

        self.kanji_index = index;
        self.kanji = Some(record);
        self.screen = Screen::KanjiDetail;
    }

    fn on_kanji_detail(&mut self, action: Action) {
        match action {
            Action::NextStroke => {
                self.animator.draw_next();
            }
            Action::AutoPlay => {
                if self.animator.is_auto_playing() {
                    self.animator.stop();
                } else {
                    self.animator.start_auto_play();
                }
            }
            Action::Reset => self.animator.reset(),
            Action::Left => {
                if self.kanji_index > 0 {
                    self.open_kanji(self.kanji_index - 1);
                }
            }
            Action::Right => {
                if self.kanji_index + 1 < self.grade_len() {
                    self.open_kanji(self.kanji_index + 1);
                }
            }
            Action::Back => {
                self.animator.stop();
                self.go(Screen::KanjiList);
                self.cursor = self.kanji_index;
            }
            _ => {}
        }
    }

    fn on_quiz_menu(&mut self, action: Action) {
        match action {
            Action::Up | Action::Down => self.move_cursor(action, QuizType::ALL.len(), 1),
            Action::Select => {
                let quiz_type = QuizType::ALL[self.cursor.min(QuizType::ALL.len() - 1)];
                self.start_quiz(quiz_type);
            }
            Action::Back => self.open_grade_select(GradePurpose::Quiz),
            _ => {}
        }
    }

    /// Start a quiz over the current grade
    pub fn start_quiz(&mut self, quiz_type: QuizType) {
        let pool = match self.source.grade(self.grade) {
            Ok(pool) => pool,
            Err(e) => {
                self.status.set_error(e.to_string());
                return;
            }
        };
        let started = self.quiz.start(quiz_type, pool).map(|_| ());
        match started {
            Ok(()) => {
                self.quiz_view = QuizView { grade: Some(self.grade), ..QuizView::default() };
                self.go(Screen::QuizPlay);
            }
            Err(e) => self.status.set_error(format!("クイズを始められません: {}", e)),
        }
    }

    /// Start a quiz over the learner's weak kanji
    pub fn start_review_quiz(&mut self) {
        let Some(plan) = self.progress.review_plan() else {
            self.status.set_error(format!(
                "苦手な漢字が{}字たまると復習できるよ",
                REVIEW_MIN_WEAK
            ));
            return;
        };

        let mut pool = Vec::with_capacity(plan.kanji.len());
        for (character, grade) in &plan.kanji {
            match self.source.find(*grade, character) {
                Ok(Some(record)) => pool.push(record),
                Ok(None) => debug!(%character, grade, "Weak kanji no longer in data"),
                Err(e) => warn!(%character, grade, error = %e, "Could not load weak kanji"),
            }
        }

        let started = self.quiz.start(plan.quiz_type, &pool).map(|_| ());
        match started {
            Ok(()) => {
                info!(quiz_type = ?plan.quiz_type, pool = pool.len(), "Review quiz started");
                self.quiz_view = QuizView::default();
                self.go(Screen::QuizPlay);
            }
            Err(e) => self.status.set_error(format!("復習クイズを始められません: {}", e)),
        }
    }

    fn on_quiz_play(&mut self, action: Action) {
        if self.quiz_view.feedback.is_some() {
            match action {
                Action::Select => self.after_feedback(),
                Action::Back => self.abandon_quiz(),
                _ => {}
            }
            return;
        }

        let Some(question) = self.quiz.current_question() else {
            return;
        };
        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => {
                let options = match &question.body {
                    QuestionBody::StrokeOrder { paths, .. } => paths.len(),
                    _ => question.choices().len(),
                };
                self.move_cursor(action, options, 1);
            }
            Action::Select => {
                let given = match &question.body {
                    QuestionBody::StrokeOrder { .. } => Answer::Stroke(self.cursor),
                    _ => match question.choices().get(self.cursor) {
                        Some(choice) => Answer::Text(choice.clone()),
                        None => return,
                    },
                };
                self.quiz_view.feedback = self.quiz.answer(&given);
            }
            Action::Back => self.abandon_quiz(),
            _ => {}
        }
    }

    fn after_feedback(&mut self) {
        let Some(feedback) = self.quiz_view.feedback.take() else {
            return;
        };
        if !feedback.correct && self.quiz.quiz_type().is_some_and(QuizType::is_stroke_related) {
            let request = self.quiz.current_question().and_then(|q| q.review_request());
            if let Some(request) = request {
                self.start_review(request);
                return;
            }
        }
        self.advance_quiz();
    }

    fn advance_quiz(&mut self) {
        self.screen = Screen::QuizPlay;
        self.cursor = 0;
        if self.quiz.next().is_none() {
            self.finish_quiz();
        }
    }

    fn finish_quiz(&mut self) {
        let Some(result) = self.quiz.finish() else {
            return;
        };
        let events = self.progress.apply_quiz_result(&result, self.quiz_view.grade);
        self.status.push_events(&events);
        self.quiz_view.result = Some(result);
        self.go(Screen::QuizResult);
    }

    fn abandon_quiz(&mut self) {
        // Nothing is recorded for a quiz left halfway
        if self.quiz.finish().is_some() {
            debug!("Quiz abandoned");
        }
        self.reviewer.destroy();
        self.review = ReviewView::default();
        self.leave_quiz();
    }

    fn leave_quiz(&mut self) {
        match self.quiz_view.grade {
            Some(_) => self.go(Screen::QuizMenu),
            None => self.go(Screen::MyPage),
        }
        self.quiz_view = QuizView { grade: self.quiz_view.grade, ..QuizView::default() };
    }

    fn on_quiz_result(&mut self, action: Action) {
        if matches!(action, Action::Select | Action::Back) {
            self.leave_quiz();
        }
    }

    fn start_review(&mut self, request: ReviewRequest) {
        let retest = self
            .quiz
            .quiz_type()
            .filter(|t| t.is_stroke_related())
            .map(|_| RetestLoop::new(request.paths.len(), request.highlight));
        self.review =
            ReviewView { retest, question: None, strokes: parse_strokes(&request.paths) };
        self.play_review(request);
        self.go(Screen::Review);
    }

    fn play_review(&mut self, request: ReviewRequest) {
        self.reviewer.start(request);
        if self.review_speed != Speed::Normal {
            self.reviewer.set_speed(self.review_speed);
        }
    }

    fn on_review(&mut self, action: Action) {
        if self.review.question.is_some() {
            match action {
                Action::Up | Action::Down | Action::Left | Action::Right => {
                    let strokes = self.review.strokes.len();
                    self.move_cursor(action, strokes, 1);
                }
                Action::Select => self.answer_retest(self.cursor),
                Action::Back => self.leave_review(),
                _ => {}
            }
            return;
        }

        match action {
            Action::CycleSpeed => {
                let next = next_speed(self.reviewer.speed());
                if self.reviewer.set_speed(next) {
                    self.review_speed = next;
                }
            }
            Action::Select => {
                if self.reviewer.practice() == Some(ReviewEvent::Memorized) {
                    self.next_retest();
                }
            }
            Action::Back => self.leave_review(),
            _ => {}
        }
    }

    fn next_retest(&mut self) {
        let question =
            self.review.retest.as_mut().and_then(|retest| retest.next_question(&mut self.rng));
        match question {
            Some(question) => {
                self.review.question = Some(question);
                self.cursor = 0;
            }
            None => self.leave_review(),
        }
    }

    fn answer_retest(&mut self, selected: usize) {
        let Some(outcome) = self.review.retest.as_mut().and_then(|retest| retest.answer(selected))
        else {
            return;
        };
        self.review.question = None;

        match outcome {
            RetestOutcome::Correct { correct } => {
                self.status.set_message(format!("せいかい！ {}/{}", correct, RETEST_REQUIRED));
                self.next_retest();
            }
            RetestOutcome::Released => {
                self.status.set_message("書き順バッチリ！");
                self.leave_review();
            }
            RetestOutcome::Replay { highlight } => {
                self.status.set_error("もう一度見てみよう");
                let request = self.quiz.current_question().and_then(|q| q.review_request());
                match request {
                    Some(mut request) => {
                        request.highlight = Some(highlight);
                        self.play_review(request);
                    }
                    None => self.leave_review(),
                }
            }
        }
    }

    fn leave_review(&mut self) {
        self.reviewer.destroy();
        self.review = ReviewView::default();
        self.advance_quiz();
    }

    fn on_puzzle_menu(&mut self, action: Action) {
        let view = &mut self.puzzle_view;
        match action {
            Action::Up | Action::Down => {
                view.field = match view.field {
                    PuzzleField::Grade => PuzzleField::Difficulty,
                    PuzzleField::Difficulty => PuzzleField::Grade,
                };
            }
            Action::Left | Action::Right => {
                let up = action == Action::Right;
                match view.field {
                    PuzzleField::Grade => view.grade = step(view.grade, up, 0, MAX_GRADE),
                    PuzzleField::Difficulty => view.difficulty = step(view.difficulty, up, 1, 3),
                }
            }
            Action::Select => self.start_puzzle(),
            Action::Back => self.go_home(HomeItem::Puzzle),
            _ => {}
        }
    }

    /// Start a round with the menu's grade and difficulty
    pub fn start_puzzle(&mut self) {
        if !self.puzzle_view.loaded {
            match self.source.puzzles() {
                Ok(records) => {
                    self.puzzle.load_data(records);
                    self.puzzle_view.loaded = true;
                    info!(pairs = self.puzzle.pool_size(), "Puzzle data loaded");
                }
                Err(e) => {
                    self.status.set_error(e.to_string());
                    return;
                }
            }
        }

        let (grade, difficulty) = (self.puzzle_view.grade, self.puzzle_view.difficulty);
        let started = self.puzzle.start(grade, difficulty).map(|_| ());
        if let Err(e) = started {
            self.status.set_error(format!("パズルを始められません: {}", e));
            return;
        }

        self.puzzle_view.first = None;
        self.puzzle_view.last = None;
        self.puzzle_view.result = None;
        self.puzzle_view.time_left = match self.puzzle.start_timer() {
            Some(TimerEvent::Tick(left)) => Some(left),
            _ => None,
        };
        self.go(Screen::PuzzlePlay);
    }

    fn on_puzzle_play(&mut self, action: Action) {
        match action {
            Action::Up | Action::Down | Action::Left | Action::Right => {
                let cards = self.puzzle.cards().len();
                self.move_cursor(action, cards, BOARD_COLUMNS);
            }
            Action::Select => self.pick_card(self.cursor),
            Action::Back => {
                // Abandoned rounds are not recorded
                self.puzzle.finish();
                self.puzzle_view.first = None;
                self.go(Screen::PuzzleMenu);
            }
            _ => {}
        }
    }

    /// Select a card; the second pick of a pair is checked
    pub fn pick_card(&mut self, index: usize) {
        let Some(card) = self.puzzle.cards().get(index) else {
            return;
        };
        if card.matched {
            return;
        }
        let id = card.id;

        let first = match self.puzzle_view.first.take() {
            None => {
                self.puzzle_view.first = Some(index);
                return;
            }
            Some(first) if first == index => return,
            Some(first) => first,
        };
        let Some(first_id) = self.puzzle.cards().get(first).map(|c| c.id) else {
            return;
        };
        let Some(outcome) = self.puzzle.try_match(first_id, id) else {
            return;
        };

        match (&outcome.answer, &outcome.hint) {
            (Some(answer), Some(hint)) if outcome.correct => {
                self.status.set_message(format!("⭕ {}  {}", answer, hint))
            }
            _ => self.status.set_error("✕ ちがうよ"),
        }
        let complete = outcome.is_complete;
        self.puzzle_view.last = Some(outcome);
        if complete {
            self.finish_puzzle();
        }
    }

    fn finish_puzzle(&mut self) {
        let Some(result) = self.puzzle.finish() else {
            return;
        };
        let events = self.progress.apply_puzzle_result(&result);
        self.status.push_events(&events);
        self.puzzle_view.first = None;
        self.puzzle_view.result = Some(result);
        self.go(Screen::PuzzleResult);
    }

    fn on_puzzle_result(&mut self, action: Action) {
        match action {
            Action::Select => self.start_puzzle(),
            Action::Back => self.go(Screen::PuzzleMenu),
            _ => {}
        }
    }

    fn on_my_page(&mut self, action: Action) {
        match action {
            Action::Select => self.start_review_quiz(),
            Action::Back => self.go_home(HomeItem::MyPage),
            _ => {}
        }
    }
}

fn next_speed(speed: Speed) -> Speed {
    let index = Speed::ALL.iter().position(|&s| s == speed).unwrap_or(0);
    Speed::ALL[(index + 1) % Speed::ALL.len()]
}

fn step(value: u8, up: bool, min: u8, max: u8) -> u8 {
    if up { value.saturating_add(1).min(max) } else { value.saturating_sub(1).max(min) }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::kanji::{KanjiRecord, MemorySource, PuzzleRecord, Readings, StrokeLabel};
    use crate::progress::{MemoryStore, ProgressTracker};
    use crate::stroke::animator::ANIM_DURATION_MS;
    use crate::stroke::ReviewPhase;
    use crate::stroke::reviewer::SETTLE_MS;

    const KANJI: [(&str, &str, &str, u32); 5] = [
        ("一", "イチ", "one", 1),
        ("二", "ニ", "two", 2),
        ("三", "サン", "three", 3),
        ("山", "サン", "mountain", 3),
        ("川", "セン", "river", 3),
    ];

    fn record(character: &str, on: &str, meaning: &str, strokes: u32) -> KanjiRecord {
        let paths = (0..strokes)
            .map(|i| format!("M{},10L{},90", 20 + i * 20, 20 + i * 20))
            .collect();
        let stroke_nums =
            (0..strokes).map(|i| StrokeLabel { x: f64::from(15 + i * 20), y: 8.0 }).collect();
        KanjiRecord {
            character: character.to_string(),
            grade: 1,
            stroke_count: strokes,
            paths,
            stroke_nums,
            readings: Readings { on: vec![on.to_string()], kun: Vec::new() },
            meaning: meaning.to_string(),
            formation: None,
        }
    }

    fn puzzles() -> Vec<PuzzleRecord> {
        [("休", "亻", "木"), ("林", "木", "木"), ("明", "日", "月"), ("男", "田", "力"), ("岩", "山", "石")]
            .into_iter()
            .map(|(answer, a, b)| PuzzleRecord {
                answer: answer.to_string(),
                parts: vec![a.to_string(), b.to_string()],
                hint: format!("{}のヒント", answer),
                grade: 1,
                difficulty: 1,
            })
            .collect()
    }

    fn app() -> AppState {
        let kanji = KANJI.iter().map(|&(c, on, m, s)| record(c, on, m, s)).collect();
        let source = MemorySource { kanji: HashMap::from([(1, kanji)]), puzzles: puzzles() };
        let progress = ProgressTracker::load(Box::new(MemoryStore::default()));
        AppState::new(&Config::default(), Box::new(source), progress).with_seed(7)
    }

    fn press(app: &mut AppState, actions: &[Action]) {
        for &action in actions {
            app.handle_action(action);
        }
    }

    #[test]
    fn quit_from_anywhere() {
        let mut app = app();
        assert!(app.handle_action(Action::Quit));
        press(&mut app, &[Action::Select, Action::Select]);
        assert_eq!(app.screen, Screen::KanjiList);
        assert!(app.handle_action(Action::Quit));
    }

    #[test]
    fn opening_a_kanji_marks_it_studied_once() {
        let mut app = app();
        press(&mut app, &[Action::Select, Action::Select, Action::Select]);
        assert_eq!(app.screen, Screen::KanjiDetail);
        assert!(app.progress.is_studied("一"));
        let points = app.progress.total_points();

        press(&mut app, &[Action::Back, Action::Select]);
        assert_eq!(app.progress.total_points(), points);
    }

    #[test]
    fn watching_the_whole_animation_awards_points() {
        let mut app = app();
        press(&mut app, &[Action::Select, Action::Select, Action::Right, Action::Select]);
        assert_eq!(app.kanji.as_ref().map(|k| k.character.as_str()), Some("二"));
        let before = app.progress.total_points();

        app.handle_action(Action::AutoPlay);
        for _ in 0..200 {
            app.tick(16.0);
        }
        assert!(app.animator.state().is_complete);
        assert_eq!(app.progress.total_points(), before + u64::from(crate::progress::ANIMATION_POINTS));
    }

    #[test]
    fn detail_arrows_move_between_kanji() {
        let mut app = app();
        press(&mut app, &[Action::Select, Action::Select, Action::Select]);
        press(&mut app, &[Action::Left]);
        assert_eq!(app.kanji_index, 0);
        press(&mut app, &[Action::Right, Action::Right]);
        assert_eq!(app.kanji_index, 2);
        assert!(app.progress.is_studied("三"));
    }

    #[test]
    fn missing_grade_is_reported() {
        let mut app = app();
        press(&mut app, &[Action::Select, Action::Down, Action::Select]);
        assert_eq!(app.screen, Screen::GradeSelect);
        assert!(app.status.current().is_some_and(|t| t.is_error));
    }

    #[test]
    fn meaning_quiz_runs_to_the_result_screen() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Select, Action::Select, Action::Down, Action::Select]);
        assert_eq!(app.screen, Screen::QuizPlay);
        assert_eq!(app.quiz.quiz_type(), Some(QuizType::Meaning));

        for _ in 0..KANJI.len() {
            app.handle_action(Action::Select);
            assert!(app.quiz_view.feedback.is_some());
            app.handle_action(Action::Select);
        }
        assert_eq!(app.screen, Screen::QuizResult);
        let result = app.quiz_view.result.as_ref().unwrap();
        assert_eq!(result.total, KANJI.len());
        assert_eq!(app.progress.scores().stats.quiz_total, KANJI.len() as u32);
    }

    #[test]
    fn not_enough_kanji_keeps_the_menu() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Select, Action::Select]);
        app.source = Box::new(MemorySource {
            kanji: HashMap::from([(1, vec![record("一", "イチ", "one", 1)])]),
            puzzles: Vec::new(),
        });
        press(&mut app, &[Action::Select]);
        assert_eq!(app.screen, Screen::QuizMenu);
        assert!(!app.quiz.is_active());
        assert!(app.status.current().is_some_and(|t| t.is_error));
    }

    #[test]
    fn wrong_stroke_order_answer_leads_to_review_and_retest() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Select, Action::Select]);
        app.cursor = 3;
        press(&mut app, &[Action::Select]);
        assert_eq!(app.quiz.quiz_type(), Some(QuizType::StrokeOrder));

        let target = match &app.quiz.current_question().unwrap().body {
            QuestionBody::StrokeOrder { target_stroke, .. } => *target_stroke,
            _ => unreachable!(),
        };
        let wrong = if target == 0 { 1 } else { 0 };
        app.cursor = wrong;
        press(&mut app, &[Action::Select, Action::Select]);
        assert_eq!(app.screen, Screen::Review);
        assert_eq!(app.reviewer.highlight(), Some(target));

        for _ in 0..500 {
            app.tick(16.0);
        }
        assert_eq!(app.reviewer.phase(), ReviewPhase::Waiting);
        press(&mut app, &[Action::Select]);
        let question = app.review.question.expect("retest question");

        app.cursor = question.target;
        press(&mut app, &[Action::Select]);
        assert_eq!(app.review.retest.as_ref().map(|r| r.correct()), Some(1));
    }

    fn choice_index(app: &AppState, correct: bool) -> usize {
        let question = app.quiz.current_question().unwrap();
        question
            .choices()
            .iter()
            .position(|c| (Answer::Text(c.clone()) == question.correct) == correct)
            .unwrap()
    }

    #[test]
    fn wrong_stroke_count_answer_is_retested_until_three_in_a_row() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Select, Action::Select]);
        app.cursor = 2;
        press(&mut app, &[Action::Select]);
        assert_eq!(app.quiz.quiz_type(), Some(QuizType::StrokeCount));

        // Single-stroke characters have nothing to retest
        while app.quiz.current_question().unwrap().paths().len() < 2 {
            app.cursor = choice_index(&app, true);
            press(&mut app, &[Action::Select, Action::Select]);
        }
        let index = app.quiz.state().unwrap().current_index;

        app.cursor = choice_index(&app, false);
        press(&mut app, &[Action::Select, Action::Select]);
        assert_eq!(app.screen, Screen::Review);
        assert!(app.review.retest.is_some());

        for _ in 0..500 {
            app.tick(16.0);
        }
        assert_eq!(app.reviewer.phase(), ReviewPhase::Waiting);
        press(&mut app, &[Action::Select]);
        assert_eq!(app.screen, Screen::Review);
        assert!(app.review.question.is_some());

        for _ in 0..RETEST_REQUIRED {
            let question = app.review.question.expect("retest question");
            app.cursor = question.target;
            press(&mut app, &[Action::Select]);
        }
        assert_eq!(app.screen, Screen::QuizPlay);
        assert!(app.review.retest.is_none());
        assert_eq!(app.quiz.state().unwrap().current_index, index + 1);
    }

    #[test]
    fn speed_change_sticks_for_later_reviews() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Select, Action::Select]);
        app.cursor = 3;
        press(&mut app, &[Action::Select]);
        let target = match &app.quiz.current_question().unwrap().body {
            QuestionBody::StrokeOrder { target_stroke, .. } => *target_stroke,
            _ => unreachable!(),
        };
        app.cursor = if target == 0 { 1 } else { 0 };
        press(&mut app, &[Action::Select, Action::Select, Action::CycleSpeed]);
        assert_eq!(app.reviewer.speed(), Speed::Fast);
        assert_eq!(app.review_speed, Speed::Fast);

        let total = app.review.strokes.len() as f64;
        app.tick(total * (Speed::Fast.stroke_ms() + Speed::Fast.gap_ms()) + SETTLE_MS + 1.0);
        assert_eq!(app.reviewer.phase(), ReviewPhase::Waiting);
        // Speed only changes while the replay runs
        press(&mut app, &[Action::CycleSpeed]);
        assert_eq!(app.review_speed, Speed::Fast);
    }

    #[test]
    fn puzzle_round_can_be_completed() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Down, Action::Select]);
        assert_eq!(app.screen, Screen::PuzzleMenu);
        press(&mut app, &[Action::Select]);
        assert_eq!(app.screen, Screen::PuzzlePlay);
        assert_eq!(app.puzzle_view.time_left, None);

        while app.screen == Screen::PuzzlePlay {
            let cards = app.puzzle.cards().to_vec();
            let first = cards.iter().position(|c| !c.matched).unwrap();
            let second = cards
                .iter()
                .enumerate()
                .position(|(i, c)| i != first && !c.matched && c.pair == cards[first].pair)
                .unwrap();
            app.pick_card(first);
            app.pick_card(second);
        }
        assert_eq!(app.screen, Screen::PuzzleResult);
        let result = app.puzzle_view.result.as_ref().unwrap();
        assert!(result.is_perfect);
        assert_eq!(app.progress.scores().stats.puzzle_correct, 5);
    }

    #[test]
    fn timed_puzzle_ends_at_zero() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Down, Action::Select, Action::Down, Action::Right]);
        assert_eq!(app.puzzle_view.difficulty, 2);
        press(&mut app, &[Action::Select]);
        assert_eq!(app.puzzle_view.time_left, Some(60));

        app.tick(60_000.0);
        assert_eq!(app.screen, Screen::PuzzleResult);
        assert_eq!(app.puzzle_view.result.as_ref().map(|r| r.correct_count), Some(0));
    }

    #[test]
    fn review_quiz_needs_weak_kanji() {
        let mut app = app();
        press(&mut app, &[Action::Down, Action::Down, Action::Down, Action::Select]);
        assert_eq!(app.screen, Screen::MyPage);
        press(&mut app, &[Action::Select]);
        assert_eq!(app.screen, Screen::MyPage);
        assert!(app.status.current().is_some_and(|t| t.is_error));
    }

    #[test]
    fn animation_tick_is_ignored_off_screen() {
        let mut app = app();
        press(&mut app, &[Action::Select, Action::Select, Action::Select, Action::NextStroke]);
        press(&mut app, &[Action::Back]);
        app.tick(ANIM_DURATION_MS * 2.0);
        assert_eq!(app.animator.state().current_stroke, 0);
    }

    #[test]
    fn speeds_cycle() {
        assert_eq!(next_speed(Speed::Normal), Speed::Fast);
        assert_eq!(next_speed(Speed::Fast), Speed::Slow);
    }
}
