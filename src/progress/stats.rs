//! Quiz and puzzle statistics and the weak-kanji list

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quiz::QuizType;

/// Most weak kanji kept at once
pub const WEAK_KANJI_CAP: usize = 50;

/// Weak kanji needed before a review quiz is offered
pub const REVIEW_MIN_WEAK: usize = 4;

/// Lifetime totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreStats {
    pub quiz_correct: u32,
    pub quiz_total: u32,
    pub puzzle_correct: u32,
    pub puzzle_total: u32,
    pub max_combo: u32,
    pub total_studied: u32,
}

impl ScoreStats {
    pub fn quiz_accuracy(&self) -> Option<f64> {
        ratio(self.quiz_correct, self.quiz_total)
    }

    pub fn puzzle_accuracy(&self) -> Option<f64> {
        ratio(self.puzzle_correct, self.puzzle_total)
    }
}

/// Quiz totals for one grade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeStats {
    pub quiz_correct: u32,
    pub quiz_total: u32,
}

impl GradeStats {
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.quiz_correct, self.quiz_total)
    }
}

/// A kanji the learner got wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakKanji {
    pub grade: u8,
    /// Quiz types it was missed in, without repeats
    pub types: Vec<QuizType>,
    /// Unix time of the latest miss, in milliseconds
    pub last_mistake: i64,
}

/// A review quiz built from the weak-kanji list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPlan {
    /// Most frequently missed quiz type
    pub quiz_type: QuizType,
    /// Characters with their grades, most recent miss first
    pub kanji: Vec<(String, u8)>,
}

/// Statistics half of the persisted progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreManager {
    pub stats: ScoreStats,
    pub per_grade: BTreeMap<u8, GradeStats>,
    pub weak_kanji: BTreeMap<String, WeakKanji>,
}

impl ScoreManager {
    /// Add a finished quiz; `grade` is `None` for mixed-grade review quizzes
    pub fn record_quiz(&mut self, correct: u32, total: u32, max_combo: u32, grade: Option<u8>) {
        self.stats.quiz_correct += correct;
        self.stats.quiz_total += total;
        self.stats.max_combo = self.stats.max_combo.max(max_combo);
        if let Some(grade) = grade {
            let entry = self.per_grade.entry(grade).or_default();
            entry.quiz_correct += correct;
            entry.quiz_total += total;
        }
    }

    pub fn record_puzzle(&mut self, correct: u32, total: u32, max_combo: u32) {
        self.stats.puzzle_correct += correct;
        self.stats.puzzle_total += total;
        self.stats.max_combo = self.stats.max_combo.max(max_combo);
    }

    /// Remember a missed kanji, evicting the stalest entry when full
    pub fn record_mistake(&mut self, character: &str, grade: u8, quiz_type: QuizType, now_ms: i64) {
        if let Some(entry) = self.weak_kanji.get_mut(character) {
            if !entry.types.contains(&quiz_type) {
                entry.types.push(quiz_type);
            }
            entry.last_mistake = now_ms;
            return;
        }

        while self.weak_kanji.len() >= WEAK_KANJI_CAP {
            let Some(oldest) = self
                .weak_kanji
                .iter()
                .min_by_key(|(c, w)| (w.last_mistake, c.as_str()))
                .map(|(c, _)| c.clone())
            else {
                break;
            };
            debug!(character = %oldest, "Evicting weak kanji");
            self.weak_kanji.remove(&oldest);
        }

        self.weak_kanji.insert(
            character.to_string(),
            WeakKanji { grade, types: vec![quiz_type], last_mistake: now_ms },
        );
    }

    pub fn update_studied(&mut self, count: usize) {
        self.stats.total_studied = count as u32;
    }

    /// Weak kanji, most recent miss first
    pub fn weak_by_recency(&self) -> Vec<(&str, &WeakKanji)> {
        let mut entries: Vec<(&str, &WeakKanji)> =
            self.weak_kanji.iter().map(|(c, w)| (c.as_str(), w)).collect();
        entries.sort_by(|a, b| b.1.last_mistake.cmp(&a.1.last_mistake).then(a.0.cmp(b.0)));
        entries
    }

    /// Plan a review quiz once enough kanji are weak
    ///
    /// Ties between quiz types go to the first in [`QuizType::ALL`] order.
    pub fn review_plan(&self) -> Option<ReviewPlan> {
        if self.weak_kanji.len() < REVIEW_MIN_WEAK {
            return None;
        }

        let mut counts: BTreeMap<QuizType, usize> = BTreeMap::new();
        for weak in self.weak_kanji.values() {
            for quiz_type in &weak.types {
                *counts.entry(*quiz_type).or_default() += 1;
            }
        }
        let quiz_type = QuizType::ALL
            .into_iter()
            .max_by_key(|t| (counts.get(t).copied().unwrap_or(0), std::cmp::Reverse(*t)))
            .unwrap_or(QuizType::Reading);

        let kanji = self
            .weak_by_recency()
            .into_iter()
            .map(|(c, w)| (c.to_string(), w.grade))
            .collect();
        Some(ReviewPlan { quiz_type, kanji })
    }
}

fn ratio(correct: u32, total: u32) -> Option<f64> {
    (total > 0).then(|| f64::from(correct) / f64::from(total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn quiz_updates_totals_and_grade() {
        let mut scores = ScoreManager::default();
        scores.record_quiz(7, 10, 4, Some(2));
        scores.record_quiz(3, 10, 2, None);
        assert_eq!(scores.stats.quiz_correct, 10);
        assert_eq!(scores.stats.quiz_total, 20);
        assert_eq!(scores.stats.max_combo, 4);
        assert_eq!(scores.per_grade[&2], GradeStats { quiz_correct: 7, quiz_total: 10 });
        assert_eq!(scores.per_grade.len(), 1);
        assert_eq!(scores.stats.quiz_accuracy(), Some(0.5));
    }

    #[test]
    fn puzzle_raises_running_max_combo() {
        let mut scores = ScoreManager::default();
        scores.record_puzzle(5, 5, 5);
        scores.record_puzzle(2, 5, 1);
        assert_eq!(scores.stats.puzzle_correct, 7);
        assert_eq!(scores.stats.max_combo, 5);
        assert_eq!(ScoreStats::default().puzzle_accuracy(), None);
    }

    #[test]
    fn repeated_mistake_merges_types() {
        let mut scores = ScoreManager::default();
        scores.record_mistake("海", 2, QuizType::Reading, 10);
        scores.record_mistake("海", 2, QuizType::Reading, 20);
        scores.record_mistake("海", 2, QuizType::StrokeOrder, 30);
        let weak = &scores.weak_kanji["海"];
        assert_eq!(weak.types, vec![QuizType::Reading, QuizType::StrokeOrder]);
        assert_eq!(weak.last_mistake, 30);
    }

    #[test]
    fn full_list_evicts_oldest_miss() {
        let mut scores = ScoreManager::default();
        for i in 0..WEAK_KANJI_CAP {
            let c = char::from_u32(0x4E00 + i as u32).unwrap().to_string();
            // The first entry is the newest
            let ts = if i == 0 { 1000 } else { i as i64 };
            scores.record_mistake(&c, 1, QuizType::Meaning, ts);
        }
        scores.record_mistake("新", 2, QuizType::Meaning, 2000);

        assert_eq!(scores.weak_kanji.len(), WEAK_KANJI_CAP);
        assert!(scores.weak_kanji.contains_key("新"));
        assert!(scores.weak_kanji.contains_key("一"));
        // Timestamp 1 was the smallest
        assert!(!scores.weak_kanji.contains_key("丁"));
    }

    #[test]
    fn review_plan_needs_four_weak_kanji() {
        let mut scores = ScoreManager::default();
        for (i, c) in ["火", "水", "木"].iter().enumerate() {
            scores.record_mistake(c, 1, QuizType::Reading, i as i64);
        }
        assert_eq!(scores.review_plan(), None);

        scores.record_mistake("金", 1, QuizType::StrokeCount, 10);
        scores.record_mistake("土", 1, QuizType::StrokeCount, 11);
        scores.record_mistake("金", 1, QuizType::Reading, 12);
        let plan = scores.review_plan().unwrap();
        assert_eq!(plan.quiz_type, QuizType::Reading);
        assert_eq!(plan.kanji[0], ("金".to_string(), 1));
        assert_eq!(plan.kanji.len(), 5);
    }

    #[test]
    fn review_plan_tie_prefers_earlier_type() {
        let mut scores = ScoreManager::default();
        for (i, c) in ["一", "二"].iter().enumerate() {
            scores.record_mistake(c, 1, QuizType::StrokeOrder, i as i64);
        }
        for (i, c) in ["三", "四"].iter().enumerate() {
            scores.record_mistake(c, 1, QuizType::Meaning, i as i64);
        }
        assert_eq!(scores.review_plan().unwrap().quiz_type, QuizType::Meaning);
    }

    #[test]
    fn deserializes_partial_blob() {
        let scores: ScoreManager =
            serde_json::from_str(r#"{"stats": {"quizCorrect": 3}}"#).unwrap();
        assert_eq!(scores.stats.quiz_correct, 3);
        assert!(scores.weak_kanji.is_empty());
    }

    proptest! {
        #[test]
        fn weak_list_never_exceeds_cap(stamps in prop::collection::vec((0u32..120, 0i64..1000), 0..300)) {
            let mut scores = ScoreManager::default();
            for (code, ts) in stamps {
                let c = char::from_u32(0x4E00 + code).unwrap().to_string();
                scores.record_mistake(&c, 1, QuizType::Reading, ts);
                prop_assert!(scores.weak_kanji.len() <= WEAK_KANJI_CAP);
                prop_assert!(scores.weak_kanji.contains_key(&c));
            }
        }
    }
}
