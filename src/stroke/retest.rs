//! Stroke-order retest that follows a review
//!
//! The learner must name three strokes of the same character in a row. A miss
//! sends them back to the replay with the stroke they missed highlighted.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IteratorRandom;

/// Consecutive correct answers needed to finish
pub const RETEST_REQUIRED: u32 = 3;

/// One retest prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetestQuestion {
    /// Zero-based stroke index to find
    pub target: usize,
    /// 1-based round within the current streak
    pub round: u32,
    /// Correct answers so far in the streak
    pub correct: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetestOutcome {
    /// Right; ask another
    Correct { correct: u32 },
    /// Third right answer in a row; the retest is over
    Released,
    /// Wrong; replay highlighting `highlight`, then start over
    Replay { highlight: usize },
}

/// Tracks asked strokes and the current streak for one character
#[derive(Debug, Clone)]
pub struct RetestLoop {
    total: usize,
    asked: BTreeSet<usize>,
    correct: u32,
    round: u32,
    target: Option<usize>,
}

impl RetestLoop {
    /// Begin after a review that highlighted `highlight`
    pub fn new(total_strokes: usize, highlight: Option<usize>) -> Self {
        let mut retest = Self {
            total: total_strokes,
            asked: BTreeSet::new(),
            correct: 0,
            round: 0,
            target: None,
        };
        retest.restart(highlight);
        retest
    }

    /// Pick the next stroke to ask about
    ///
    /// Returns `None` for characters too short to quiz, which ends the loop.
    pub fn next_question(&mut self, rng: &mut impl Rng) -> Option<RetestQuestion> {
        if self.total < 2 {
            return None;
        }
        if self.asked.len() >= self.total {
            self.asked.clear();
        }
        let target = (0..self.total).filter(|i| !self.asked.contains(i)).choose(rng)?;
        self.asked.insert(target);
        self.target = Some(target);
        self.round += 1;
        Some(RetestQuestion { target, round: self.round, correct: self.correct })
    }

    /// Grade the learner's pick for the current question
    pub fn answer(&mut self, selected: usize) -> Option<RetestOutcome> {
        let target = self.target.take()?;
        if selected == target {
            self.correct += 1;
            if self.correct >= RETEST_REQUIRED {
                return Some(RetestOutcome::Released);
            }
            return Some(RetestOutcome::Correct { correct: self.correct });
        }
        self.restart(Some(target));
        Some(RetestOutcome::Replay { highlight: target })
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn current(&self) -> Option<usize> {
        self.target
    }

    fn restart(&mut self, highlight: Option<usize>) {
        self.correct = 0;
        self.round = 0;
        self.target = None;
        self.asked.clear();
        if let Some(i) = highlight.filter(|&i| i < self.total) {
            self.asked.insert(i);
        }
    }
}
