//! Achievement badges

use std::collections::BTreeMap;

use tracing::info;

/// Kanji taught in each grade
pub const GRADE_COUNTS: [(u8, usize); 6] = [(1, 80), (2, 160), (3, 200), (4, 202), (5, 193), (6, 191)];

/// Every kanji across the six grades
pub const ALL_KANJI: usize = 1026;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const BADGES: [Badge; 12] = [
    Badge { id: "first_step", name: "はじめの一歩", icon: "🐣", description: "初めて書き順アニメを見た" },
    Badge { id: "explorer", name: "漢字たんけん家", icon: "🔍", description: "10文字の書き順を見た" },
    Badge { id: "grade1_master", name: "一年生マスター", icon: "⭐", description: "小1全80字クリア" },
    Badge { id: "grade2_master", name: "二年生マスター", icon: "⭐⭐", description: "小2全160字クリア" },
    Badge { id: "grade3_master", name: "三年生マスター", icon: "⭐⭐⭐", description: "小3全200字クリア" },
    Badge { id: "grade4_master", name: "四年生マスター", icon: "⭐⭐⭐⭐", description: "小4全202字クリア" },
    Badge { id: "grade5_master", name: "五年生マスター", icon: "⭐⭐⭐⭐⭐", description: "小5全193字クリア" },
    Badge { id: "grade6_master", name: "六年生マスター", icon: "⭐⭐⭐⭐⭐⭐", description: "小6全191字クリア" },
    Badge { id: "bushu_expert", name: "部首はかせ", icon: "🧩", description: "部首パズル50問正解" },
    Badge { id: "combo_king", name: "コンボキング", icon: "🔥", description: "10連続正解" },
    Badge { id: "quiz_champion", name: "クイズチャンピオン", icon: "🏆", description: "クイズ100問正解" },
    Badge { id: "all_kanji", name: "全漢字制覇", icon: "👑", description: "1,026字全完了" },
];

pub fn find_badge(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}

/// What the badge conditions look at
#[derive(Debug, Clone, Copy)]
pub struct BadgeInput<'a> {
    /// Studied characters with their grades
    pub studied: &'a BTreeMap<String, u8>,
    pub quiz_correct: u32,
    pub puzzle_correct: u32,
    pub max_combo: u32,
}

/// A badge with its unlock time, for listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStatus {
    pub badge: &'static Badge,
    pub unlocked_at: Option<i64>,
}

/// Tracks which badges are unlocked and when
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeManager {
    unlocked: BTreeMap<String, i64>,
}

impl BadgeManager {
    pub fn from_state(unlocked: BTreeMap<String, i64>) -> Self {
        Self { unlocked }
    }

    /// Badge id to unlock time in unix milliseconds
    pub fn state(&self) -> &BTreeMap<String, i64> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn all(&self) -> Vec<BadgeStatus> {
        BADGES
            .iter()
            .map(|badge| BadgeStatus { badge, unlocked_at: self.unlocked.get(badge.id).copied() })
            .collect()
    }

    /// Unlock every badge whose condition holds
    ///
    /// Returns only the badges unlocked by this call, so each badge is
    /// reported once over the learner's lifetime.
    pub fn check_all(&mut self, input: &BadgeInput<'_>, now_ms: i64) -> Vec<&'static Badge> {
        let studied = input.studied.len();
        let mut earned = Vec::new();

        let mut check = |id: &'static str, condition: bool| {
            if condition && !self.unlocked.contains_key(id) {
                self.unlocked.insert(id.to_string(), now_ms);
                if let Some(badge) = find_badge(id) {
                    info!(badge = id, "Badge unlocked");
                    earned.push(badge);
                }
            }
        };

        check("first_step", studied >= 1);
        check("explorer", studied >= 10);
        for (grade, required) in GRADE_COUNTS {
            let count = input.studied.values().filter(|&&g| g == grade).count();
            let id = BADGES[(grade + 1) as usize].id;
            check(id, count >= required);
        }
        check("all_kanji", studied >= ALL_KANJI);
        check("bushu_expert", input.puzzle_correct >= 50);
        check("combo_king", input.max_combo >= 10);
        check("quiz_champion", input.quiz_correct >= 100);

        earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn studied(grade: u8, count: usize) -> BTreeMap<String, u8> {
        (0..count)
            .map(|i| (char::from_u32(0x4E00 + grade as u32 * 1000 + i as u32).unwrap().to_string(), grade))
            .collect()
    }

    fn input(studied: &BTreeMap<String, u8>) -> BadgeInput<'_> {
        BadgeInput { studied, quiz_correct: 0, puzzle_correct: 0, max_combo: 0 }
    }

    #[test]
    fn grade_master_ids_line_up() {
        for (grade, _) in GRADE_COUNTS {
            assert_eq!(BADGES[(grade + 1) as usize].id, format!("grade{}_master", grade));
        }
    }

    #[test]
    fn first_study_unlocks_first_step_once() {
        let mut badges = BadgeManager::default();
        let one = studied(1, 1);
        let earned = badges.check_all(&input(&one), 5);
        assert_eq!(earned.iter().map(|b| b.id).collect::<Vec<_>>(), vec!["first_step"]);
        assert_eq!(badges.state()["first_step"], 5);

        assert!(badges.check_all(&input(&one), 6).is_empty());
        assert_eq!(badges.state()["first_step"], 5);
    }

    #[test]
    fn grade_master_needs_full_grade() {
        let mut badges = BadgeManager::default();
        let almost = studied(1, 79);
        badges.check_all(&input(&almost), 1);
        assert!(!badges.is_unlocked("grade1_master"));
        assert!(badges.is_unlocked("explorer"));

        let full = studied(1, 80);
        let earned = badges.check_all(&input(&full), 2);
        assert_eq!(earned.iter().map(|b| b.id).collect::<Vec<_>>(), vec!["grade1_master"]);
    }

    #[test]
    fn stat_badges() {
        let mut badges = BadgeManager::default();
        let none = BTreeMap::new();
        let stats = BadgeInput { studied: &none, quiz_correct: 100, puzzle_correct: 50, max_combo: 10 };
        let mut ids: Vec<&str> = badges.check_all(&stats, 1).iter().map(|b| b.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["bushu_expert", "combo_king", "quiz_champion"]);
        assert_eq!(badges.unlocked_count(), 3);
    }

    #[test]
    fn listing_includes_locked_badges() {
        let badges = BadgeManager::from_state(BTreeMap::from([("combo_king".to_string(), 9)]));
        let all = badges.all();
        assert_eq!(all.len(), 12);
        assert_eq!(all.iter().filter(|s| s.unlocked_at.is_some()).count(), 1);
        assert_eq!(all[9].unlocked_at, Some(9));
    }
}
