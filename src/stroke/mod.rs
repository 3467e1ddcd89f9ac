//! Stroke drawing: geometry, the study animator, and the review replay

pub mod animator;
pub mod geometry;
pub mod retest;
pub mod reviewer;

pub use animator::{AnimationEvent, AnimatorState, StrokeAnimator, StrokeFrame, StrokeStatus};
pub use geometry::{CANVAS_SIZE, Polyline};
pub use retest::{RETEST_REQUIRED, RetestLoop, RetestOutcome, RetestQuestion};
pub use reviewer::{ReviewEvent, ReviewPhase, ReviewRequest, ReviewStroke, Speed, StrokeReviewer};
