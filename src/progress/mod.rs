//! Learner progress: points, levels, statistics, weak kanji and badges
//!
//! Everything is kept in one JSON blob stored under [`STORAGE_KEY`]. Storage
//! failures never reach the learner; they are logged and the tracker carries
//! on with what it has in memory.

pub mod badges;
pub mod level;
pub mod stats;
pub mod store;

pub use badges::{BADGES, Badge, BadgeInput, BadgeManager, BadgeStatus};
pub use level::{LevelProgress, calc_level, check_level_up, level_progress};
pub use stats::{GradeStats, ReviewPlan, ScoreManager, ScoreStats, WeakKanji};
pub use store::{BlobStore, FileStore, MemoryStore};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::puzzle::PuzzleResult;
use crate::quiz::QuizResult;
use crate::sync::ScoreSync;

/// Key of the progress blob
pub const STORAGE_KEY: &str = "kanji-stroke-progress";

/// Points for opening a kanji for the first time
pub const STUDY_POINTS: u32 = 5;

/// Points for watching a full stroke animation
pub const ANIMATION_POINTS: u32 = 5;

/// The persisted blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressState {
    /// Studied characters with their grades
    pub studied_kanji: BTreeMap<String, u8>,
    pub total_points: u64,
    /// Badge id to unlock time
    pub badges: BTreeMap<String, i64>,
    pub stats: ScoreStats,
    pub per_grade: BTreeMap<u8, GradeStats>,
    pub weak_kanji: BTreeMap<String, WeakKanji>,
}

/// Something the learner should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    PointsAwarded { amount: u32, reason: String, total: u64 },
    LevelUp { level: u32 },
    BadgeUnlocked(&'static Badge),
}

impl ProgressEvent {
    /// One-line notification text
    pub fn message(&self) -> String {
        match self {
            ProgressEvent::PointsAwarded { amount, reason, .. } => {
                format!("{} +{} ALT", reason, amount)
            }
            ProgressEvent::LevelUp { level } => format!("レベルアップ！ Lv.{}", level),
            ProgressEvent::BadgeUnlocked(badge) => {
                format!("{} バッジ獲得: {}", badge.icon, badge.name)
            }
        }
    }
}

/// Owns the learner's progress and persists it after every change
pub struct ProgressTracker {
    store: Box<dyn BlobStore>,
    studied: BTreeMap<String, u8>,
    total_points: u64,
    scores: ScoreManager,
    badges: BadgeManager,
    sync: Option<Arc<dyn ScoreSync>>,
    /// Points earned since the last `take_session_points`
    session_points: u32,
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("studied", &self.studied.len())
            .field("total_points", &self.total_points)
            .field("sync", &self.sync.is_some())
            .finish()
    }
}

impl ProgressTracker {
    /// Load progress from `store`, starting fresh if it is missing or unreadable
    pub fn load(store: Box<dyn BlobStore>) -> Self {
        let state = match read_state(store.as_ref()) {
            Ok(Some(state)) => {
                debug!(points = state.total_points, "Progress loaded");
                state
            }
            Ok(None) => ProgressState::default(),
            Err(e) => {
                warn!(error = %e, "Could not load progress, starting fresh");
                ProgressState::default()
            }
        };

        Self {
            store,
            studied: state.studied_kanji,
            total_points: state.total_points,
            scores: ScoreManager {
                stats: state.stats,
                per_grade: state.per_grade,
                weak_kanji: state.weak_kanji,
            },
            badges: BadgeManager::from_state(state.badges),
            sync: None,
            session_points: 0,
        }
    }

    /// Forward every award to `sync`
    pub fn with_sync(mut self, sync: Arc<dyn ScoreSync>) -> Self {
        self.sync = Some(sync);
        self
    }

    /// Snapshot of the persisted blob
    pub fn state(&self) -> ProgressState {
        ProgressState {
            studied_kanji: self.studied.clone(),
            total_points: self.total_points,
            badges: self.badges.state().clone(),
            stats: self.scores.stats,
            per_grade: self.scores.per_grade.clone(),
            weak_kanji: self.scores.weak_kanji.clone(),
        }
    }

    /// Write the blob; failures are logged and otherwise ignored
    pub fn save(&mut self) {
        let result = serde_json::to_string(&self.state())
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(STORAGE_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Could not save progress");
        }
    }

    /// Forget everything, in memory and in storage
    pub fn reset(&mut self) {
        self.studied.clear();
        self.total_points = 0;
        self.scores = ScoreManager::default();
        self.badges = BadgeManager::default();
        self.session_points = 0;
        if let Err(e) = self.store.remove(STORAGE_KEY) {
            warn!(error = %e, "Could not remove stored progress");
        }
        info!("Progress reset");
    }

    /// Record that a kanji was opened; only the first visit earns points
    pub fn mark_studied(&mut self, character: &str, grade: u8) -> Vec<ProgressEvent> {
        if self.studied.contains_key(character) {
            return Vec::new();
        }
        self.studied.insert(character.to_string(), grade);
        self.scores.update_studied(self.studied.len());
        let events = self.award(STUDY_POINTS, "書き順を確認");
        self.save();
        events
    }

    /// Record a fully watched stroke animation
    pub fn complete_animation(&mut self, character: &str) -> Vec<ProgressEvent> {
        debug!(character, "Animation watched");
        let events = self.award(ANIMATION_POINTS, "書き順アニメ完走");
        self.save();
        events
    }

    /// Fold a finished quiz into the statistics; `grade` is `None` for review quizzes
    pub fn apply_quiz_result(&mut self, result: &QuizResult, grade: Option<u8>) -> Vec<ProgressEvent> {
        self.scores.record_quiz(result.correct_count, result.total as u32, result.max_combo, grade);

        let now = now_ms();
        for mistake in &result.mistakes {
            self.scores.record_mistake(&mistake.kanji, mistake.grade, mistake.quiz_type, now);
        }

        let events = if result.earned_points > 0 {
            self.award(result.earned_points, "クイズ完了")
        } else {
            self.check_badges()
        };
        self.save();
        events
    }

    pub fn apply_puzzle_result(&mut self, result: &PuzzleResult) -> Vec<ProgressEvent> {
        self.scores.record_puzzle(
            result.correct_count as u32,
            result.total as u32,
            result.max_combo,
        );
        let events = if result.earned_points > 0 {
            self.award(result.earned_points, "パズル完了")
        } else {
            self.check_badges()
        };
        self.save();
        events
    }

    /// Add points, then check for a level-up and new badges
    pub fn award_points(&mut self, amount: u32, reason: &str) -> Vec<ProgressEvent> {
        let events = self.award(amount, reason);
        self.save();
        events
    }

    /// Unlock any badges whose conditions now hold
    pub fn check_badges(&mut self) -> Vec<ProgressEvent> {
        let input = BadgeInput {
            studied: &self.studied,
            quiz_correct: self.scores.stats.quiz_correct,
            puzzle_correct: self.scores.stats.puzzle_correct,
            max_combo: self.scores.stats.max_combo,
        };
        self.badges
            .check_all(&input, now_ms())
            .into_iter()
            .map(ProgressEvent::BadgeUnlocked)
            .collect()
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn level(&self) -> u32 {
        calc_level(self.total_points)
    }

    pub fn level_progress(&self) -> LevelProgress {
        level_progress(self.total_points)
    }

    pub fn scores(&self) -> &ScoreManager {
        &self.scores
    }

    pub fn badges(&self) -> &BadgeManager {
        &self.badges
    }

    pub fn is_studied(&self, character: &str) -> bool {
        self.studied.contains_key(character)
    }

    pub fn studied_count(&self) -> usize {
        self.studied.len()
    }

    pub fn studied_in_grade(&self, grade: u8) -> usize {
        self.studied.values().filter(|&&g| g == grade).count()
    }

    /// Review quiz over the weak kanji, once there are enough of them
    pub fn review_plan(&self) -> Option<ReviewPlan> {
        self.scores.review_plan()
    }

    /// Points earned since the last call
    pub fn take_session_points(&mut self) -> u32 {
        std::mem::take(&mut self.session_points)
    }

    fn award(&mut self, amount: u32, reason: &str) -> Vec<ProgressEvent> {
        let previous = self.total_points;
        self.total_points += u64::from(amount);
        self.session_points += amount;

        let mut events = vec![ProgressEvent::PointsAwarded {
            amount,
            reason: reason.to_string(),
            total: self.total_points,
        }];
        if let Some(level) = check_level_up(previous, self.total_points) {
            info!(level, "Level up");
            events.push(ProgressEvent::LevelUp { level });
        }
        events.extend(self.check_badges());

        if let Some(sync) = &self.sync {
            sync.notify(amount, reason);
        }
        events
    }
}

fn read_state(store: &dyn BlobStore) -> Result<Option<ProgressState>, StoreError> {
    match store.get(STORAGE_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}
