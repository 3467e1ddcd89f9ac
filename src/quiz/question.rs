//! Question generation for the four quiz types

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::kanji::{KanjiRecord, StrokeLabel};
use crate::stroke::ReviewRequest;

/// Offsets tried, in order, for stroke-count distractors
const STROKE_COUNT_OFFSETS: [i64; 6] = [-2, -1, 1, 2, -3, 3];

/// Distractors per choice question
const DISTRACTORS: usize = 3;

/// Which aspect of a kanji a quiz asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizType {
    Reading,
    Meaning,
    StrokeCount,
    StrokeOrder,
}

impl QuizType {
    pub const ALL: [QuizType; 4] =
        [QuizType::Reading, QuizType::Meaning, QuizType::StrokeCount, QuizType::StrokeOrder];

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            QuizType::Reading => "読み",
            QuizType::Meaning => "意味",
            QuizType::StrokeCount => "画数",
            QuizType::StrokeOrder => "書き順",
        }
    }

    /// Wrong answers to these trigger a stroke review
    pub fn is_stroke_related(self) -> bool {
        matches!(self, QuizType::StrokeCount | QuizType::StrokeOrder)
    }

    /// Whether a kanji can be asked about with this type
    pub fn is_eligible(self, kanji: &KanjiRecord) -> bool {
        match self {
            QuizType::Reading => !kanji.readings.is_empty(),
            QuizType::Meaning => !kanji.meaning.is_empty(),
            QuizType::StrokeCount | QuizType::StrokeOrder => kanji.drawable_strokes() > 0,
        }
    }
}

/// A learner's answer, or the expected one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// A choice label
    Text(String),
    /// A zero-based stroke index
    Stroke(usize),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(text) => write!(f, "{}", text),
            Answer::Stroke(index) => write!(f, "{}画目", index + 1),
        }
    }
}

/// Type-specific part of a question
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionBody {
    /// Reading or meaning choices
    Choices(Vec<String>),
    StrokeCount {
        choices: Vec<String>,
        paths: Vec<String>,
        stroke_nums: Vec<StrokeLabel>,
    },
    StrokeOrder {
        paths: Vec<String>,
        stroke_nums: Vec<StrokeLabel>,
        target_stroke: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub quiz_type: QuizType,
    pub kanji: String,
    pub grade: u8,
    pub text: String,
    pub explanation: String,
    pub correct: Answer,
    pub body: QuestionBody,
}

impl Question {
    /// Choice labels, empty for stroke-order questions
    pub fn choices(&self) -> &[String] {
        match &self.body {
            QuestionBody::Choices(choices) | QuestionBody::StrokeCount { choices, .. } => choices,
            QuestionBody::StrokeOrder { .. } => &[],
        }
    }

    /// Stroke paths carried by stroke-related questions
    pub fn paths(&self) -> &[String] {
        match &self.body {
            QuestionBody::Choices(_) => &[],
            QuestionBody::StrokeCount { paths, .. } | QuestionBody::StrokeOrder { paths, .. } => {
                paths
            }
        }
    }

    /// Replay to show after a wrong answer, if this question has strokes
    pub fn review_request(&self) -> Option<ReviewRequest> {
        let (paths, stroke_nums, highlight) = match &self.body {
            QuestionBody::Choices(_) => return None,
            QuestionBody::StrokeCount { paths, stroke_nums, .. } => (paths, stroke_nums, None),
            QuestionBody::StrokeOrder { paths, stroke_nums, target_stroke } => {
                (paths, stroke_nums, Some(*target_stroke))
            }
        };
        if paths.is_empty() {
            return None;
        }
        Some(ReviewRequest {
            character: self.kanji.clone(),
            paths: paths.clone(),
            stroke_nums: stroke_nums.clone(),
            highlight,
        })
    }
}

/// Build one question about `kanji`, drawing distractors from `eligible`
///
/// Returns `None` when the kanji cannot carry this question type.
pub fn build_question<R: Rng + ?Sized>(
    quiz_type: QuizType,
    kanji: &KanjiRecord,
    eligible: &[&KanjiRecord],
    rng: &mut R,
) -> Option<Question> {
    match quiz_type {
        QuizType::Reading => reading_question(kanji, eligible, rng),
        QuizType::Meaning => meaning_question(kanji, eligible, rng),
        QuizType::StrokeCount => Some(stroke_count_question(kanji, rng)),
        QuizType::StrokeOrder => stroke_order_question(kanji, rng),
    }
}

fn reading_question<R: Rng + ?Sized>(
    kanji: &KanjiRecord,
    eligible: &[&KanjiRecord],
    rng: &mut R,
) -> Option<Question> {
    let all = kanji.readings.all();
    let correct = all.choose(rng)?.to_string();

    let mut others: Vec<&KanjiRecord> = eligible
        .iter()
        .copied()
        .filter(|k| k.character != kanji.character && !k.readings.is_empty())
        .collect();
    others.shuffle(rng);

    let mut distractors: Vec<String> = Vec::new();
    for other in others {
        if distractors.len() >= DISTRACTORS {
            break;
        }
        let Some(pick) = other.readings.all().choose(rng).map(|s| s.to_string()) else {
            continue;
        };
        if pick != correct && !distractors.contains(&pick) {
            distractors.push(pick);
        }
    }

    Some(Question {
        quiz_type: QuizType::Reading,
        kanji: kanji.character.clone(),
        grade: kanji.grade,
        text: "この漢字の読みは？".to_string(),
        explanation: format!("「{}」の読み: {}", kanji.character, all.join("、")),
        body: QuestionBody::Choices(shuffled_choices(&correct, distractors, rng)),
        correct: Answer::Text(correct),
    })
}

fn meaning_question<R: Rng + ?Sized>(
    kanji: &KanjiRecord,
    eligible: &[&KanjiRecord],
    rng: &mut R,
) -> Option<Question> {
    if kanji.meaning.is_empty() {
        return None;
    }
    let correct = kanji.meaning.clone();

    let mut others: Vec<&KanjiRecord> = eligible
        .iter()
        .copied()
        .filter(|k| k.character != kanji.character && !k.meaning.is_empty())
        .collect();
    others.shuffle(rng);

    let mut distractors: Vec<String> = Vec::new();
    for other in others {
        if distractors.len() >= DISTRACTORS {
            break;
        }
        if other.meaning != correct && !distractors.contains(&other.meaning) {
            distractors.push(other.meaning.clone());
        }
    }

    Some(Question {
        quiz_type: QuizType::Meaning,
        kanji: kanji.character.clone(),
        grade: kanji.grade,
        text: "この漢字の意味は？".to_string(),
        explanation: format!("「{}」の意味: {}", kanji.character, correct),
        body: QuestionBody::Choices(shuffled_choices(&correct, distractors, rng)),
        correct: Answer::Text(correct),
    })
}

fn stroke_count_question<R: Rng + ?Sized>(kanji: &KanjiRecord, rng: &mut R) -> Question {
    let count = i64::from(kanji.stroke_count);
    let correct = format!("{}画", count);

    let distractors: Vec<String> = STROKE_COUNT_OFFSETS
        .iter()
        .map(|offset| count + offset)
        .filter(|&n| n > 0)
        .take(DISTRACTORS)
        .map(|n| format!("{}画", n))
        .collect();

    Question {
        quiz_type: QuizType::StrokeCount,
        kanji: kanji.character.clone(),
        grade: kanji.grade,
        text: "この漢字は何画？".to_string(),
        explanation: format!("「{}」は {}画 です", kanji.character, count),
        body: QuestionBody::StrokeCount {
            choices: shuffled_choices(&correct, distractors, rng),
            paths: kanji.paths.clone(),
            stroke_nums: kanji.stroke_nums.clone(),
        },
        correct: Answer::Text(correct),
    }
}

fn stroke_order_question<R: Rng + ?Sized>(kanji: &KanjiRecord, rng: &mut R) -> Option<Question> {
    let total = kanji.paths.len();
    if total < 2 {
        return None;
    }
    // Never the first stroke
    let target = rng.gen_range(1..total);
    let ordinal = target + 1;

    Some(Question {
        quiz_type: QuizType::StrokeOrder,
        kanji: kanji.character.clone(),
        grade: kanji.grade,
        text: format!("{}画目はどれ？", ordinal),
        explanation: format!("「{}」の {}画目 はハイライトされた線です", kanji.character, ordinal),
        body: QuestionBody::StrokeOrder {
            paths: kanji.paths.clone(),
            stroke_nums: kanji.stroke_nums.clone(),
            target_stroke: target,
        },
        correct: Answer::Stroke(target),
    })
}

fn shuffled_choices<R: Rng + ?Sized>(
    correct: &str,
    distractors: Vec<String>,
    rng: &mut R,
) -> Vec<String> {
    let mut choices = Vec::with_capacity(distractors.len() + 1);
    choices.push(correct.to_string());
    choices.extend(distractors);
    choices.shuffle(rng);
    choices
}
