//! Consistency checks for puzzle data

use std::collections::{BTreeMap, HashMap};

use super::model::{MAX_GRADE, MIN_GRADE, PuzzleRecord};
use crate::puzzle::PAIRS_PER_ROUND;

/// A problem found in the puzzle data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleIssue {
    MissingAnswer { index: usize },
    WrongPartCount { index: usize, answer: String, parts: usize },
    MissingHint { index: usize, answer: String },
    GradeOutOfRange { index: usize, answer: String, grade: u8 },
    DifficultyOutOfRange { index: usize, answer: String, difficulty: u8 },
    DuplicateAnswer { answer: String },
    /// Two records share the same two parts, which text matching cannot tell apart
    DuplicateParts { first: String, second: String },
    /// A grade cannot fill a round on its own
    TooFewForGrade { grade: u8, count: usize },
}

impl std::fmt::Display for PuzzleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PuzzleIssue::MissingAnswer { index } => write!(f, "Entry {}: missing answer", index),
            PuzzleIssue::WrongPartCount { index, answer, parts } => {
                write!(f, "Entry {} ({}): parts.length={}, expected 2", index, answer, parts)
            }
            PuzzleIssue::MissingHint { index, answer } => {
                write!(f, "Entry {} ({}): missing hint", index, answer)
            }
            PuzzleIssue::GradeOutOfRange { index, answer, grade } => {
                write!(f, "Entry {} ({}): grade={}, expected 1-6", index, answer, grade)
            }
            PuzzleIssue::DifficultyOutOfRange { index, answer, difficulty } => {
                write!(f, "Entry {} ({}): difficulty={}, expected 1-3", index, answer, difficulty)
            }
            PuzzleIssue::DuplicateAnswer { answer } => write!(f, "Duplicate answer: {}", answer),
            PuzzleIssue::DuplicateParts { first, second } => {
                write!(f, "{} and {} share the same parts", first, second)
            }
            PuzzleIssue::TooFewForGrade { grade, count } => {
                write!(f, "Grade {} has only {} puzzles (need {})", grade, count, PAIRS_PER_ROUND)
            }
        }
    }
}

/// Summary of a validation pass
#[derive(Debug, Default)]
pub struct PuzzleReport {
    pub total: usize,
    pub per_grade: BTreeMap<u8, usize>,
    pub per_difficulty: BTreeMap<u8, usize>,
    pub issues: Vec<PuzzleIssue>,
}

impl PuzzleReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every record and the data set as a whole
pub fn validate_puzzles(records: &[PuzzleRecord]) -> PuzzleReport {
    let mut report = PuzzleReport { total: records.len(), ..Default::default() };
    let mut answers: HashMap<&str, usize> = HashMap::new();
    let mut part_owners: HashMap<Vec<&str>, &str> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let answer = record.answer.clone();
        if record.answer.is_empty() {
            report.issues.push(PuzzleIssue::MissingAnswer { index });
        }
        if record.parts.len() != 2 {
            report.issues.push(PuzzleIssue::WrongPartCount {
                index,
                answer: answer.clone(),
                parts: record.parts.len(),
            });
        }
        if record.hint.is_empty() {
            report.issues.push(PuzzleIssue::MissingHint { index, answer: answer.clone() });
        }
        if !(MIN_GRADE..=MAX_GRADE).contains(&record.grade) {
            report.issues.push(PuzzleIssue::GradeOutOfRange {
                index,
                answer: answer.clone(),
                grade: record.grade,
            });
        }
        if !(1..=3).contains(&record.difficulty) {
            report.issues.push(PuzzleIssue::DifficultyOutOfRange {
                index,
                answer: answer.clone(),
                difficulty: record.difficulty,
            });
        }

        *report.per_grade.entry(record.grade).or_default() += 1;
        *report.per_difficulty.entry(record.difficulty).or_default() += 1;

        let seen = answers.entry(record.answer.as_str()).or_default();
        *seen += 1;
        if *seen == 2 {
            report.issues.push(PuzzleIssue::DuplicateAnswer { answer });
        }

        if record.parts.len() == 2 {
            if let Some(first) = part_owners.insert(record.part_key(), record.answer.as_str()) {
                report.issues.push(PuzzleIssue::DuplicateParts {
                    first: first.to_string(),
                    second: record.answer.clone(),
                });
            }
        }
    }

    for grade in MIN_GRADE..=MAX_GRADE {
        let count = report.per_grade.get(&grade).copied().unwrap_or(0);
        if count < PAIRS_PER_ROUND {
            report.issues.push(PuzzleIssue::TooFewForGrade { grade, count });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(answer: &str, a: &str, b: &str, grade: u8) -> PuzzleRecord {
        PuzzleRecord {
            answer: answer.into(),
            parts: vec![a.into(), b.into()],
            hint: "hint".into(),
            grade,
            difficulty: 1,
        }
    }

    fn full_set() -> Vec<PuzzleRecord> {
        let mut records = Vec::new();
        for grade in 1..=6u8 {
            for i in 0..5u32 {
                let answer = char::from_u32(0x4E00 + grade as u32 * 16 + i).unwrap().to_string();
                records.push(record(&answer, &format!("a{}{}", grade, i), "b", grade));
            }
        }
        records
    }

    #[test]
    fn clean_data_has_no_issues() {
        let report = validate_puzzles(&full_set());
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.total, 30);
        assert_eq!(report.per_grade[&3], 5);
    }

    #[test]
    fn flags_three_part_records() {
        let mut records = full_set();
        records[0].parts.push("c".into());
        let report = validate_puzzles(&records);
        assert!(matches!(report.issues[0], PuzzleIssue::WrongPartCount { parts: 3, .. }));
    }

    #[test]
    fn flags_duplicate_answers_once() {
        let mut records = full_set();
        let dup = records[0].clone();
        records.push(dup.clone());
        records.push(dup);
        let report = validate_puzzles(&records);
        let dupes = report
            .issues
            .iter()
            .filter(|i| matches!(i, PuzzleIssue::DuplicateAnswer { .. }))
            .count();
        assert_eq!(dupes, 1);
    }

    #[test]
    fn flags_shared_part_pairs_in_either_order() {
        let mut records = full_set();
        records.push(record("X", "b", "a10", 1));
        let report = validate_puzzles(&records);
        assert!(report.issues.contains(&PuzzleIssue::DuplicateParts {
            first: records[0].answer.clone(),
            second: "X".into(),
        }));
    }

    #[test]
    fn flags_grades_that_cannot_fill_a_round() {
        let records: Vec<_> = full_set().into_iter().filter(|r| r.grade != 4).collect();
        let report = validate_puzzles(&records);
        assert!(report.issues.contains(&PuzzleIssue::TooFewForGrade { grade: 4, count: 0 }));
    }

    #[test]
    fn flags_out_of_range_grade_and_difficulty() {
        let mut records = full_set();
        records[0].grade = 7;
        records[1].difficulty = 4;
        let report = validate_puzzles(&records);
        assert!(report.issues.iter().any(|i| matches!(i, PuzzleIssue::GradeOutOfRange { grade: 7, .. })));
        assert!(
            report
                .issues
                .iter()
                .any(|i| matches!(i, PuzzleIssue::DifficultyOutOfRange { difficulty: 4, .. }))
        );
    }
}
