//! Component matching puzzle
//!
//! Five characters are split into their two parts and the ten part cards are
//! shuffled together. The learner picks two cards at a time; a pick is correct
//! when the two texts are the parts of a character not yet assembled.

pub mod timer;

pub use timer::{Countdown, TimerEvent, time_limit};

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::kanji::PuzzleRecord;
use crate::quiz::combo_points;

/// Characters per round
pub const PAIRS_PER_ROUND: usize = 5;

/// Score per correct match
pub const MATCH_SCORE: u32 = 100;

/// Points per correct match before the combo bonus
pub const MATCH_POINTS: u32 = 15;

/// Points for a flawless round
pub const PERFECT_BONUS: u32 = 100;

/// One part card on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// `pair * 2 + part`
    pub id: usize,
    pub pair: usize,
    pub text: String,
    pub matched: bool,
}

/// Feedback for a pick of two cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub correct: bool,
    /// Assembled character when correct
    pub answer: Option<String>,
    pub parts: Option<Vec<String>>,
    pub hint: Option<String>,
    pub pair_index: Option<usize>,
    pub combo: u32,
    pub score: u32,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleState {
    pub matched_count: usize,
    pub total: usize,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub mistakes: u32,
    /// Seconds left on a timed round
    pub time_left: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleResult {
    pub score: u32,
    pub total: usize,
    pub correct_count: usize,
    pub accuracy: f64,
    pub max_combo: u32,
    /// Includes the perfect bonus
    pub earned_points: u32,
    pub bonus_points: u32,
    pub mistake_count: u32,
    pub is_perfect: bool,
    /// Characters left unassembled, for review
    pub unmatched: Vec<PuzzleRecord>,
}

#[derive(Debug)]
struct PuzzleRound {
    pairs: Vec<PuzzleRecord>,
    pair_matched: Vec<bool>,
    cards: Vec<Card>,
    difficulty: u8,
    matched_count: usize,
    score: u32,
    combo: u32,
    max_combo: u32,
    earned_points: u32,
    mistakes: u32,
}

/// Runs one puzzle round at a time
#[derive(Debug)]
pub struct PuzzleEngine {
    rng: StdRng,
    puzzles: Vec<PuzzleRecord>,
    round: Option<PuzzleRound>,
    countdown: Countdown,
}

impl Default for PuzzleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleEngine {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Engine with reproducible pair selection and card order
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self { rng, puzzles: Vec::new(), round: None, countdown: Countdown::default() }
    }

    /// Keep the playable two-part records
    pub fn load_data(&mut self, records: Vec<PuzzleRecord>) {
        let total = records.len();
        self.puzzles = records.into_iter().filter(|p| p.parts.len() == 2).collect();
        if self.puzzles.len() < total {
            debug!(dropped = total - self.puzzles.len(), "Dropped puzzles without exactly two parts");
        }
    }

    /// Number of playable records loaded
    pub fn pool_size(&self) -> usize {
        self.puzzles.len()
    }

    /// Start a round; `grade` 0 means any grade
    ///
    /// Any running countdown is stopped. The timer itself is started
    /// separately with [`PuzzleEngine::start_timer`].
    pub fn start(&mut self, grade: u8, difficulty: u8) -> Result<&[Card], SessionError> {
        self.countdown.stop();
        self.round = None;

        let mut pool: Vec<&PuzzleRecord> = self
            .puzzles
            .iter()
            .filter(|p| grade == 0 || p.grade == grade)
            .filter(|p| p.difficulty <= difficulty)
            .collect();
        pool.shuffle(&mut self.rng);

        // Text matching cannot tell apart two pairs with the same parts
        let mut seen = HashSet::new();
        let pairs: Vec<PuzzleRecord> =
            pool.into_iter().filter(|p| seen.insert(p.part_key())).cloned().collect();
        if pairs.len() < PAIRS_PER_ROUND {
            debug!(grade, difficulty, eligible = pairs.len(), "Puzzle setting unavailable");
            return Err(SessionError::NotEnoughPairs {
                eligible: pairs.len(),
                required: PAIRS_PER_ROUND,
            });
        }
        let pairs: Vec<PuzzleRecord> = pairs.into_iter().take(PAIRS_PER_ROUND).collect();

        let mut cards: Vec<Card> = pairs
            .iter()
            .enumerate()
            .flat_map(|(pair, record)| {
                record.parts.iter().enumerate().map(move |(part, text)| Card {
                    id: pair * 2 + part,
                    pair,
                    text: text.clone(),
                    matched: false,
                })
            })
            .collect();
        cards.shuffle(&mut self.rng);

        info!(grade, difficulty, "Puzzle round started");
        let round = self.round.insert(PuzzleRound {
            pair_matched: vec![false; pairs.len()],
            pairs,
            cards,
            difficulty,
            matched_count: 0,
            score: 0,
            combo: 0,
            max_combo: 0,
            earned_points: 0,
            mistakes: 0,
        });
        Ok(&round.cards)
    }

    /// Start the countdown for the round's difficulty
    ///
    /// Returns the initial tick, or `None` for untimed rounds.
    pub fn start_timer(&mut self) -> Option<TimerEvent> {
        self.countdown.stop();
        let limit = time_limit(self.round.as_ref()?.difficulty)?;
        Some(self.countdown.start(limit))
    }

    pub fn stop_timer(&mut self) {
        self.countdown.stop();
    }

    pub fn tick(&mut self, elapsed_ms: f64) -> Vec<TimerEvent> {
        self.countdown.tick(elapsed_ms)
    }

    /// Check whether two cards assemble a remaining character
    ///
    /// Returns `None` for unknown or identical ids, for already matched cards,
    /// and when no round is running.
    pub fn try_match(&mut self, a: usize, b: usize) -> Option<MatchOutcome> {
        let round = self.round.as_mut()?;
        if a == b {
            return None;
        }
        let first = round.cards.iter().position(|c| c.id == a)?;
        let second = round.cards.iter().position(|c| c.id == b)?;
        if round.cards[first].matched || round.cards[second].matched {
            return None;
        }

        let (text_a, text_b) = (&round.cards[first].text, &round.cards[second].text);
        let found = round
            .pairs
            .iter()
            .enumerate()
            .position(|(i, p)| !round.pair_matched[i] && p.matches_parts(text_a, text_b));

        let mut outcome = MatchOutcome {
            correct: found.is_some(),
            answer: None,
            parts: None,
            hint: None,
            pair_index: found,
            combo: 0,
            score: 0,
            is_complete: false,
        };

        match found {
            Some(pair) => {
                round.cards[first].matched = true;
                round.cards[second].matched = true;
                round.pair_matched[pair] = true;
                round.matched_count += 1;
                round.combo += 1;
                round.max_combo = round.max_combo.max(round.combo);
                round.score += MATCH_SCORE;
                round.earned_points += combo_points(MATCH_POINTS, round.combo);

                let record = &round.pairs[pair];
                outcome.answer = Some(record.answer.clone());
                outcome.parts = Some(record.parts.clone());
                outcome.hint = Some(record.hint.clone());
                debug!(answer = %record.answer, combo = round.combo, "Puzzle match");
            }
            None => {
                round.combo = 0;
                round.mistakes += 1;
            }
        }

        outcome.combo = round.combo;
        outcome.score = round.score;
        outcome.is_complete = round.matched_count >= PAIRS_PER_ROUND;
        if outcome.is_complete {
            self.countdown.stop();
        }
        Some(outcome)
    }

    /// Cards in board order
    pub fn cards(&self) -> &[Card] {
        self.round.as_ref().map(|r| r.cards.as_slice()).unwrap_or(&[])
    }

    /// The round's characters
    pub fn pairs(&self) -> &[PuzzleRecord] {
        self.round.as_ref().map(|r| r.pairs.as_slice()).unwrap_or(&[])
    }

    pub fn state(&self) -> Option<PuzzleState> {
        let round = self.round.as_ref()?;
        let timed = time_limit(round.difficulty).is_some();
        Some(PuzzleState {
            matched_count: round.matched_count,
            total: PAIRS_PER_ROUND,
            score: round.score,
            combo: round.combo,
            max_combo: round.max_combo,
            mistakes: round.mistakes,
            time_left: timed.then(|| self.countdown.left()),
        })
    }

    pub fn is_active(&self) -> bool {
        self.round.is_some()
    }

    /// End the round and compute its result
    pub fn finish(&mut self) -> Option<PuzzleResult> {
        self.countdown.stop();
        let round = self.round.take()?;
        let is_perfect = round.matched_count == PAIRS_PER_ROUND && round.mistakes == 0;
        let bonus_points = if is_perfect { PERFECT_BONUS } else { 0 };
        let unmatched = round
            .pairs
            .iter()
            .zip(&round.pair_matched)
            .filter(|(_, matched)| !**matched)
            .map(|(p, _)| p.clone())
            .collect();

        info!(matched = round.matched_count, mistakes = round.mistakes, "Puzzle round finished");

        Some(PuzzleResult {
            score: round.score,
            total: PAIRS_PER_ROUND,
            correct_count: round.matched_count,
            accuracy: round.matched_count as f64 / PAIRS_PER_ROUND as f64,
            max_combo: round.max_combo,
            earned_points: round.earned_points + bonus_points,
            bonus_points,
            mistake_count: round.mistakes,
            is_perfect,
            unmatched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(answer: &str, a: &str, b: &str, grade: u8, difficulty: u8) -> PuzzleRecord {
        PuzzleRecord {
            answer: answer.into(),
            parts: vec![a.into(), b.into()],
            hint: format!("{}と{}", a, b),
            grade,
            difficulty,
        }
    }

    fn data() -> Vec<PuzzleRecord> {
        vec![
            record("休", "亻", "木", 1, 1),
            record("林", "木", "木", 1, 1),
            record("男", "田", "力", 1, 1),
            record("明", "日", "月", 2, 1),
            record("岩", "山", "石", 2, 2),
            record("花", "艹", "化", 1, 2),
            record("村", "木", "寸", 1, 3),
            record("町", "田", "丁", 1, 1),
            record("森", "木", "林", 1, 3),
        ]
    }

    fn engine() -> PuzzleEngine {
        let mut engine = PuzzleEngine::with_seed(42);
        engine.load_data(data());
        engine
    }

    /// Two unmatched cards that do not assemble any character
    fn mismatched_ids(engine: &PuzzleEngine) -> (usize, usize) {
        let open: Vec<&Card> = engine.cards().iter().filter(|c| !c.matched).collect();
        for a in &open {
            for b in open.iter().filter(|b| b.id != a.id) {
                if !engine.pairs().iter().any(|p| p.matches_parts(&a.text, &b.text)) {
                    return (a.id, b.id);
                }
            }
        }
        panic!("every remaining pick is a match");
    }

    #[test]
    fn load_drops_non_two_part_records() {
        let mut engine = PuzzleEngine::with_seed(1);
        let mut records = data();
        records.push(PuzzleRecord {
            answer: "謝".into(),
            parts: vec!["言".into(), "身".into(), "寸".into()],
            hint: String::new(),
            grade: 5,
            difficulty: 3,
        });
        engine.load_data(records);
        assert_eq!(engine.pool_size(), 9);
    }

    #[test]
    fn start_requires_five_eligible_pairs() {
        let mut engine = engine();
        // Grade 2 has only two records
        let err = engine.start(2, 3).unwrap_err();
        assert!(matches!(err, SessionError::NotEnoughPairs { eligible: 2, required: 5 }));
        assert!(!engine.is_active());
    }

    #[test]
    fn difficulty_filter_is_inclusive() {
        let mut engine = engine();
        // Grade 1 at difficulty 1: 休 林 男 町
        assert!(engine.start(1, 1).is_err());
        // Difficulty 2 adds 花
        assert!(engine.start(1, 2).is_ok());
        assert!(engine.pairs().iter().all(|p| p.grade == 1 && p.difficulty <= 2));
    }

    #[test]
    fn round_has_ten_cards_with_paired_ids() {
        let mut engine = engine();
        let cards = engine.start(0, 3).unwrap().to_vec();
        assert_eq!(cards.len(), 10);

        let mut ids: Vec<usize> = cards.iter().map(|c| c.id).collect();
        ids.sort();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());

        for card in &cards {
            let pair = &engine.pairs()[card.pair];
            assert_eq!(card.pair, card.id / 2);
            assert_eq!(card.text, pair.parts[card.id % 2]);
        }
    }

    #[test]
    fn round_pairs_have_distinct_parts() {
        for seed in 0..20 {
            let mut engine = PuzzleEngine::with_seed(seed);
            let mut records = data();
            // Same parts as 休, in the other order
            records.push(record("体", "木", "亻", 1, 1));
            engine.load_data(records);
            engine.start(0, 3).unwrap();
            let mut keys: Vec<Vec<&str>> = engine.pairs().iter().map(|p| p.part_key()).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), PAIRS_PER_ROUND);
        }
    }

    #[test]
    fn matching_in_either_order() {
        let mut engine = engine();
        engine.start(0, 3).unwrap();
        let answer = engine.pairs()[0].answer.clone();

        let outcome = engine.try_match(1, 0).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.answer, Some(answer));
        assert_eq!(outcome.pair_index, Some(0));
        assert_eq!((outcome.combo, outcome.score), (1, 100));
        assert!(engine.cards().iter().filter(|c| c.pair == 0).all(|c| c.matched));
    }

    #[test]
    fn invalid_picks_are_rejected() {
        let mut engine = engine();
        assert!(engine.try_match(0, 1).is_none());

        engine.start(0, 3).unwrap();
        assert!(engine.try_match(3, 3).is_none());
        assert!(engine.try_match(0, 10).is_none());

        engine.try_match(0, 1).unwrap();
        // A matched pair cannot be matched again
        assert!(engine.try_match(0, 1).is_none());
        assert!(engine.try_match(0, 2).is_none());
        assert_eq!(engine.state().unwrap().matched_count, 1);
    }

    #[test]
    fn mismatch_resets_combo() {
        let mut engine = engine();
        engine.start(0, 3).unwrap();
        engine.try_match(0, 1).unwrap();
        engine.try_match(2, 3).unwrap();

        let (a, b) = mismatched_ids(&engine);
        let outcome = engine.try_match(a, b).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.combo, 0);
        assert_eq!(outcome.score, 200);
        assert_eq!(engine.state().unwrap().mistakes, 1);
        assert_eq!(engine.state().unwrap().max_combo, 2);
    }

    #[test]
    fn perfect_round_earns_bonus() {
        let mut engine = engine();
        engine.start(0, 3).unwrap();
        for pair in 0..PAIRS_PER_ROUND {
            let outcome = engine.try_match(pair * 2, pair * 2 + 1).unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.is_complete, pair == PAIRS_PER_ROUND - 1);
        }

        let result = engine.finish().unwrap();
        assert!(result.is_perfect);
        assert_eq!(result.accuracy, 1.0);
        // 15 + 25 + 30 + 35 + 40 plus the bonus
        assert_eq!(result.earned_points, 145 + PERFECT_BONUS);
        assert!(result.unmatched.is_empty());
        assert!(engine.finish().is_none());
    }

    #[test]
    fn partial_round_lists_unmatched_pairs() {
        let mut engine = engine();
        engine.start(0, 3).unwrap();
        engine.try_match(0, 1).unwrap();
        let remaining: Vec<String> = engine.pairs()[1..].iter().map(|p| p.answer.clone()).collect();

        let result = engine.finish().unwrap();
        assert!(!result.is_perfect);
        assert_eq!(result.bonus_points, 0);
        assert_eq!(result.accuracy, 0.2);
        let unmatched: Vec<String> = result.unmatched.iter().map(|p| p.answer.clone()).collect();
        assert_eq!(unmatched, remaining);
    }

    #[test]
    fn timer_follows_difficulty() {
        let mut engine = engine();
        engine.start(1, 2).unwrap();
        assert_eq!(engine.start_timer(), Some(TimerEvent::Tick(60)));
        assert_eq!(engine.tick(1000.0), vec![TimerEvent::Tick(59)]);
        assert_eq!(engine.state().unwrap().time_left, Some(59));

        engine.start(0, 3).unwrap();
        assert!(engine.tick(5000.0).is_empty(), "restart stops the previous countdown");
        assert_eq!(engine.start_timer(), Some(TimerEvent::Tick(40)));
    }

    #[test]
    fn untimed_round_has_no_timer() {
        let mut engine = PuzzleEngine::with_seed(3);
        let mut records = data();
        for r in records.iter_mut() {
            r.difficulty = 1;
        }
        engine.load_data(records);
        engine.start(0, 1).unwrap();
        assert_eq!(engine.start_timer(), None);
        assert_eq!(engine.state().unwrap().time_left, None);
    }
}
