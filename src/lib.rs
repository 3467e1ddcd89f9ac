//! Kanji Stroke - a terminal kanji trainer
//!
//! Animated stroke order for every elementary-school kanji, four kinds of
//! quiz with a stroke review loop for mistakes, a radical matching puzzle,
//! and levels and badges that persist between sessions.

pub mod app;
pub mod config;
pub mod error;
pub mod kanji;
pub mod progress;
pub mod puzzle;
pub mod quiz;
pub mod stroke;
pub mod sync;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
