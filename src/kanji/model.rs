//! Kanji and puzzle records as they appear in the per-grade JSON files

use serde::{Deserialize, Serialize};

/// Lowest school grade covered by the data set
pub const MIN_GRADE: u8 = 1;
/// Highest school grade covered by the data set
pub const MAX_GRADE: u8 = 6;

/// Position of a stroke's ordinal label on the 109x109 KanjiVG canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeLabel {
    pub x: f64,
    pub y: f64,
}

/// On'yomi and kun'yomi readings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readings {
    #[serde(default)]
    pub on: Vec<String>,
    #[serde(default)]
    pub kun: Vec<String>,
}

impl Readings {
    /// All readings, on'yomi first
    pub fn all(&self) -> Vec<&str> {
        self.on.iter().chain(self.kun.iter()).map(String::as_str).collect()
    }

    /// Whether at least one reading is known
    pub fn is_empty(&self) -> bool {
        self.on.is_empty() && self.kun.is_empty()
    }
}

/// How the character was formed (pictograph, compound ideograph, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

impl Formation {
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty() && self.description.is_empty()
    }
}

/// One kanji with its stroke data
///
/// Records are immutable once loaded; engines only ever borrow or clone them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiRecord {
    /// The character itself
    #[serde(rename = "char")]
    pub character: String,

    /// School grade (1-6)
    pub grade: u8,

    /// Canonical stroke count
    pub stroke_count: u32,

    /// SVG path data per stroke, in drawing order
    #[serde(default)]
    pub paths: Vec<String>,

    /// Label positions, parallel to `paths`
    #[serde(default)]
    pub stroke_nums: Vec<StrokeLabel>,

    #[serde(default)]
    pub readings: Readings,

    #[serde(default)]
    pub meaning: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formation: Option<Formation>,
}

impl KanjiRecord {
    /// Number of strokes that can actually be drawn
    pub fn drawable_strokes(&self) -> usize {
        self.paths.len()
    }

    /// Readings joined for display, e.g. `ニチ・ジツ / ひ・か`
    pub fn reading_line(&self) -> String {
        let mut parts = Vec::new();
        if !self.readings.on.is_empty() {
            parts.push(self.readings.on.join("・"));
        }
        if !self.readings.kun.is_empty() {
            parts.push(self.readings.kun.join("・"));
        }
        parts.join(" / ")
    }
}

/// A character decomposed into two parts for the matching puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    /// The assembled character
    pub answer: String,

    /// Component parts; only two-part records are playable
    pub parts: Vec<String>,

    #[serde(default)]
    pub hint: String,

    pub grade: u8,

    pub difficulty: u8,
}

impl PuzzleRecord {
    /// Whether the two parts match `a` and `b` in either order
    pub fn matches_parts(&self, a: &str, b: &str) -> bool {
        match self.parts.as_slice() {
            [first, second] => (first == a && second == b) || (first == b && second == a),
            _ => false,
        }
    }

    /// Order-independent key for the part pair
    pub fn part_key(&self) -> Vec<&str> {
        let mut key: Vec<&str> = self.parts.iter().map(String::as_str).collect();
        key.sort_unstable();
        key
    }
}
