//! Quiz sessions: generation, grading, scoring and combos

pub mod question;

pub use question::{Answer, Question, QuestionBody, QuizType, build_question};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::kanji::KanjiRecord;

/// Questions asked per session
pub const QUESTIONS_PER_SET: usize = 10;

/// Eligible kanji needed before a quiz type is playable
pub const MIN_ELIGIBLE: usize = 4;

/// Score per correct answer
pub const BASE_SCORE: u32 = 100;

/// Points per correct answer before the combo bonus
pub const BASE_POINTS: u32 = 10;

/// Points for answering every question correctly
pub const PERFECT_BONUS: u32 = 100;

/// Points for one correct answer at `combo` (already incremented)
///
/// From a combo of 2 upwards, 5 points per combo step are added, capped at 50.
pub fn combo_points(base: u32, combo: u32) -> u32 {
    if combo >= 2 { base + (5 * combo).min(50) } else { base }
}

/// A wrong answer kept for the result screen and weak-kanji tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub kanji: String,
    pub grade: u8,
    pub quiz_type: QuizType,
    pub question: String,
    pub given: Answer,
    pub correct: Answer,
    pub explanation: String,
}

/// Feedback for a single answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: Answer,
    pub explanation: String,
    pub combo: u32,
    pub score: u32,
    /// Points earned so far this session
    pub earned_points: u32,
    pub is_last: bool,
}

/// Snapshot of a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizState {
    pub current_index: usize,
    pub total: usize,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub correct_count: u32,
}

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub quiz_type: QuizType,
    pub score: u32,
    pub total: usize,
    pub correct_count: u32,
    pub accuracy: f64,
    pub max_combo: u32,
    /// Includes the perfect bonus
    pub earned_points: u32,
    pub bonus_points: u32,
    pub mistakes: Vec<Mistake>,
    pub is_perfect: bool,
}

#[derive(Debug)]
struct QuizSession {
    quiz_type: QuizType,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    combo: u32,
    max_combo: u32,
    correct_count: u32,
    earned_points: u32,
    mistakes: Vec<Mistake>,
}

/// Runs one quiz session at a time
#[derive(Debug)]
pub struct QuizEngine {
    rng: StdRng,
    session: Option<QuizSession>,
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEngine {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy(), session: None }
    }

    /// Engine with reproducible question order and choices
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), session: None }
    }

    /// Start a new session, replacing any running one
    pub fn start(
        &mut self,
        quiz_type: QuizType,
        pool: &[KanjiRecord],
    ) -> Result<&Question, SessionError> {
        self.session = None;

        let eligible: Vec<&KanjiRecord> = pool.iter().filter(|k| quiz_type.is_eligible(k)).collect();
        if eligible.len() < MIN_ELIGIBLE {
            debug!(?quiz_type, eligible = eligible.len(), "Quiz type unavailable");
            return Err(SessionError::NotEnoughKanji {
                eligible: eligible.len(),
                required: MIN_ELIGIBLE,
            });
        }

        let mut picked = eligible.clone();
        picked.shuffle(&mut self.rng);
        picked.truncate(QUESTIONS_PER_SET);

        let questions: Vec<Question> = picked
            .into_iter()
            .filter_map(|kanji| build_question(quiz_type, kanji, &eligible, &mut self.rng))
            .collect();
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        info!(?quiz_type, questions = questions.len(), "Quiz started");
        let session = self.session.insert(QuizSession {
            quiz_type,
            questions,
            current: 0,
            score: 0,
            combo: 0,
            max_combo: 0,
            correct_count: 0,
            earned_points: 0,
            mistakes: Vec::new(),
        });
        Ok(&session.questions[0])
    }

    /// Grade an answer to the current question
    ///
    /// Returns `None` when no question is active.
    pub fn answer(&mut self, given: &Answer) -> Option<AnswerOutcome> {
        let session = self.session.as_mut()?;
        let question = session.questions.get(session.current)?;
        let correct = *given == question.correct;

        if correct {
            session.correct_count += 1;
            session.combo += 1;
            session.max_combo = session.max_combo.max(session.combo);
            session.score += BASE_SCORE;
            session.earned_points += combo_points(BASE_POINTS, session.combo);
        } else {
            session.combo = 0;
            session.mistakes.push(Mistake {
                kanji: question.kanji.clone(),
                grade: question.grade,
                quiz_type: question.quiz_type,
                question: question.text.clone(),
                given: given.clone(),
                correct: question.correct.clone(),
                explanation: question.explanation.clone(),
            });
        }
        debug!(kanji = %question.kanji, correct, combo = session.combo, "Quiz answer");

        Some(AnswerOutcome {
            correct,
            correct_answer: question.correct.clone(),
            explanation: question.explanation.clone(),
            combo: session.combo,
            score: session.score,
            earned_points: session.earned_points,
            is_last: session.current + 1 >= session.questions.len(),
        })
    }

    /// Move to the next question; `None` once the set is exhausted
    pub fn next(&mut self) -> Option<&Question> {
        let session = self.session.as_mut()?;
        if session.current < session.questions.len() {
            session.current += 1;
        }
        session.questions.get(session.current)
    }

    pub fn current_question(&self) -> Option<&Question> {
        let session = self.session.as_ref()?;
        session.questions.get(session.current)
    }

    pub fn state(&self) -> Option<QuizState> {
        self.session.as_ref().map(|s| QuizState {
            current_index: s.current,
            total: s.questions.len(),
            score: s.score,
            combo: s.combo,
            max_combo: s.max_combo,
            correct_count: s.correct_count,
        })
    }

    pub fn quiz_type(&self) -> Option<QuizType> {
        self.session.as_ref().map(|s| s.quiz_type)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// End the session and compute its result
    ///
    /// The session is consumed, so the perfect bonus is awarded at most once.
    pub fn finish(&mut self) -> Option<QuizResult> {
        let session = self.session.take()?;
        let total = session.questions.len();
        let is_perfect = total > 0 && session.correct_count as usize == total;
        let bonus_points = if is_perfect { PERFECT_BONUS } else { 0 };
        let accuracy =
            if total > 0 { f64::from(session.correct_count) / total as f64 } else { 0.0 };

        info!(
            quiz_type = ?session.quiz_type,
            correct = session.correct_count,
            total,
            "Quiz finished"
        );

        Some(QuizResult {
            quiz_type: session.quiz_type,
            score: session.score,
            total,
            correct_count: session.correct_count,
            accuracy,
            max_combo: session.max_combo,
            earned_points: session.earned_points + bonus_points,
            bonus_points,
            mistakes: session.mistakes,
            is_perfect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanji::Readings;
    use pretty_assertions::assert_eq;

    fn kanji(character: &str, strokes: u32, reading: &str, meaning: &str) -> KanjiRecord {
        KanjiRecord {
            character: character.into(),
            grade: 2,
            stroke_count: strokes,
            paths: (0..strokes).map(|i| format!("M10,{y}L90,{y}", y = 10 + i * 10)).collect(),
            stroke_nums: Vec::new(),
            readings: Readings { on: vec![reading.into()], kun: Vec::new() },
            meaning: meaning.into(),
            formation: None,
        }
    }

    fn pool(n: usize) -> Vec<KanjiRecord> {
        let chars = ["春", "夏", "秋", "冬", "朝", "昼", "夜", "東", "西", "南", "北", "雪"];
        chars
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, c)| kanji(c, 3 + i as u32, &format!("よみ{}", i), &format!("意味{}", i)))
            .collect()
    }

    fn answer_correctly(engine: &mut QuizEngine) -> AnswerOutcome {
        let correct = engine.current_question().unwrap().correct.clone();
        engine.answer(&correct).unwrap()
    }

    #[test]
    fn combo_points_formula() {
        assert_eq!(combo_points(10, 1), 10);
        assert_eq!(combo_points(10, 2), 20);
        assert_eq!(combo_points(10, 5), 35);
        assert_eq!(combo_points(10, 10), 60);
        assert_eq!(combo_points(10, 30), 60);
        assert_eq!(combo_points(15, 3), 30);
    }

    #[test]
    fn too_few_eligible_is_rejected() {
        let mut engine = QuizEngine::with_seed(1);
        let mut pool = pool(5);
        for k in pool.iter_mut().skip(2) {
            k.meaning.clear();
        }
        let err = engine.start(QuizType::Meaning, &pool).unwrap_err();
        assert!(matches!(err, SessionError::NotEnoughKanji { eligible: 2, required: 4 }));
        assert!(!engine.is_active());
        assert!(engine.answer(&Answer::Text("x".into())).is_none());
    }

    #[test]
    fn session_size_is_capped() {
        let mut engine = QuizEngine::with_seed(2);
        engine.start(QuizType::Reading, &pool(12)).unwrap();
        assert_eq!(engine.state().unwrap().total, QUESTIONS_PER_SET);

        engine.start(QuizType::Reading, &pool(6)).unwrap();
        assert_eq!(engine.state().unwrap().total, 6);
    }

    #[test]
    fn questions_sample_without_replacement() {
        let mut engine = QuizEngine::with_seed(3);
        engine.start(QuizType::Meaning, &pool(10)).unwrap();
        let mut seen = Vec::new();
        loop {
            seen.push(engine.current_question().unwrap().kanji.clone());
            if engine.next().is_none() {
                break;
            }
        }
        let mut unique = seen.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), seen.len());
    }

    #[test]
    fn correct_answers_build_combo_and_points() {
        let mut engine = QuizEngine::with_seed(4);
        engine.start(QuizType::StrokeCount, &pool(8)).unwrap();

        let first = answer_correctly(&mut engine);
        assert_eq!((first.combo, first.score, first.earned_points), (1, 100, 10));
        engine.next();
        let second = answer_correctly(&mut engine);
        assert_eq!((second.combo, second.score, second.earned_points), (2, 200, 30));
        engine.next();
        let third = answer_correctly(&mut engine);
        assert_eq!(third.earned_points, 30 + 25);
    }

    #[test]
    fn wrong_answer_resets_combo_and_records_mistake() {
        let mut engine = QuizEngine::with_seed(5);
        engine.start(QuizType::Reading, &pool(6)).unwrap();
        answer_correctly(&mut engine);
        engine.next();

        let outcome = engine.answer(&Answer::Text("ちがう".into())).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.combo, 0);
        assert_eq!(outcome.score, 100);

        let state = engine.state().unwrap();
        assert_eq!(state.max_combo, 1);
        let result = engine.finish().unwrap();
        assert_eq!(result.mistakes.len(), 1);
        assert_eq!(result.mistakes[0].given, Answer::Text("ちがう".into()));
        assert_eq!(result.mistakes[0].quiz_type, QuizType::Reading);
        assert_eq!(result.mistakes[0].grade, 2);
    }

    #[test]
    fn next_reports_end_of_set() {
        let mut engine = QuizEngine::with_seed(6);
        engine.start(QuizType::Meaning, &pool(4)).unwrap();
        for _ in 0..3 {
            assert!(engine.next().is_some());
        }
        assert!(engine.next().is_none());
        assert!(engine.current_question().is_none());
        assert!(engine.answer(&Answer::Text("x".into())).is_none());
        assert!(engine.next().is_none());
    }

    #[test]
    fn last_question_is_flagged() {
        let mut engine = QuizEngine::with_seed(7);
        engine.start(QuizType::Meaning, &pool(4)).unwrap();
        assert!(!answer_correctly(&mut engine).is_last);
        for _ in 0..3 {
            engine.next();
        }
        assert!(answer_correctly(&mut engine).is_last);
    }

    #[test]
    fn perfect_session_gets_bonus_once() {
        let mut engine = QuizEngine::with_seed(8);
        engine.start(QuizType::Reading, &pool(4)).unwrap();
        loop {
            answer_correctly(&mut engine);
            if engine.next().is_none() {
                break;
            }
        }
        let result = engine.finish().unwrap();
        assert!(result.is_perfect);
        assert_eq!(result.bonus_points, PERFECT_BONUS);
        // 10 + 20 + 25 + 30 plus the bonus
        assert_eq!(result.earned_points, 85 + PERFECT_BONUS);
        assert_eq!(result.accuracy, 1.0);

        assert!(engine.finish().is_none());
    }

    #[test]
    fn stroke_order_drops_single_stroke_kanji() {
        let mut engine = QuizEngine::with_seed(9);
        let mut pool = pool(5);
        pool[0].paths.truncate(1);
        engine.start(QuizType::StrokeOrder, &pool).unwrap();
        assert_eq!(engine.state().unwrap().total, 4);
    }

    #[test]
    fn restart_replaces_session() {
        let mut engine = QuizEngine::with_seed(10);
        engine.start(QuizType::Reading, &pool(5)).unwrap();
        answer_correctly(&mut engine);
        engine.start(QuizType::Meaning, &pool(5)).unwrap();
        let state = engine.state().unwrap();
        assert_eq!((state.score, state.current_index, state.correct_count), (0, 0, 0));
        assert_eq!(engine.quiz_type(), Some(QuizType::Meaning));
    }
}
