//! Kanji and puzzle data: records, sources and validation

pub mod model;
pub mod source;
pub mod validate;

pub use model::{Formation, KanjiRecord, MAX_GRADE, MIN_GRADE, PuzzleRecord, Readings, StrokeLabel};
pub use source::{DataSource, FsDataSource, KanjiSource, MemorySource, PuzzleSource};
