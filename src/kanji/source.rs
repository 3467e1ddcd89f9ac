//! Loading kanji and puzzle records from the static JSON data directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::model::{KanjiRecord, MAX_GRADE, MIN_GRADE, PuzzleRecord};
use crate::error::DataError;

/// File holding every puzzle decomposition
pub const PUZZLE_FILE: &str = "bushu-data.json";

/// Supplies per-grade kanji lists
pub trait KanjiSource {
    /// Kanji of one grade in canonical order; cached after the first load
    fn grade(&mut self, grade: u8) -> Result<&[KanjiRecord], DataError>;

    /// Look up a single character within a grade
    fn find(&mut self, grade: u8, character: &str) -> Result<Option<KanjiRecord>, DataError> {
        Ok(self.grade(grade)?.iter().find(|k| k.character == character).cloned())
    }
}

/// Supplies the full puzzle list in one call
pub trait PuzzleSource {
    fn puzzles(&mut self) -> Result<Vec<PuzzleRecord>, DataError>;
}

/// Both kanji and puzzles from one place
pub trait DataSource: KanjiSource + PuzzleSource {}

impl<T: KanjiSource + PuzzleSource> DataSource for T {}

/// Reads `kanji-grade{N}.json` and `bushu-data.json` from a directory
#[derive(Debug)]
pub struct FsDataSource {
    dir: PathBuf,
    grades: HashMap<u8, Vec<KanjiRecord>>,
}

impl FsDataSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), grades: HashMap::new() }
    }

    /// Directory the data files are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name of a grade's kanji list
    pub fn grade_file(grade: u8) -> String {
        format!("kanji-grade{}.json", grade)
    }
}

impl KanjiSource for FsDataSource {
    fn grade(&mut self, grade: u8) -> Result<&[KanjiRecord], DataError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            return Err(DataError::GradeOutOfRange(grade));
        }

        if !self.grades.contains_key(&grade) {
            let path = self.dir.join(Self::grade_file(grade));
            let records: Vec<KanjiRecord> = read_json(&path)?;
            info!(grade, count = records.len(), "Loaded kanji grade");
            self.grades.insert(grade, records);
        } else {
            debug!(grade, "Kanji grade served from cache");
        }

        Ok(self.grades.get(&grade).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl PuzzleSource for FsDataSource {
    fn puzzles(&mut self) -> Result<Vec<PuzzleRecord>, DataError> {
        let path = self.dir.join(PUZZLE_FILE);
        let records: Vec<PuzzleRecord> = read_json(&path)?;
        info!(count = records.len(), "Loaded puzzle data");
        Ok(records)
    }
}

/// In-memory source, handy for tests and demos
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    pub kanji: HashMap<u8, Vec<KanjiRecord>>,
    pub puzzles: Vec<PuzzleRecord>,
}

impl KanjiSource for MemorySource {
    fn grade(&mut self, grade: u8) -> Result<&[KanjiRecord], DataError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            return Err(DataError::GradeOutOfRange(grade));
        }
        Ok(self.kanji.get(&grade).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl PuzzleSource for MemorySource {
    fn puzzles(&mut self) -> Result<Vec<PuzzleRecord>, DataError> {
        Ok(self.puzzles.clone())
    }
}

/// Read a JSON array of records from disk
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&contents)
        .map_err(|source| DataError::Json { path: path.to_path_buf(), source })
}
