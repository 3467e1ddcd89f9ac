//! Stroke-by-stroke reveal of a single character
//!
//! The animator is a stepper: callers feed it elapsed time through
//! [`StrokeAnimator::tick`] from whatever clock drives the screen, and read
//! [`StrokeAnimator::frame`] to render. Nothing here knows about terminals.
//!
//! ```text
//! Empty --load--> Loaded --draw_next--> Animating --600ms--> Idle ... --> Complete
//!                   ^                                                      |
//!                   +------------------------- reset ---------------------+
//! ```

use tracing::debug;

use super::geometry::{Polyline, parse_strokes};
use crate::kanji::{KanjiRecord, StrokeLabel};

/// Time to reveal one stroke
pub const ANIM_DURATION_MS: f64 = 600.0;

/// Pause between strokes during auto-play
pub const STROKE_GAP_MS: f64 = 750.0;

/// Ease-out cubic: fast start, gentle landing
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Lifecycle of the animator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Nothing loaded yet
    #[default]
    Empty,
    /// Character loaded, no stroke drawn since the last load/reset
    Loaded,
    /// Between strokes
    Idle,
    /// A stroke is being revealed
    Animating,
    /// Every stroke is drawn
    Complete,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// `current` of `total` strokes are drawn
    Progress { current: usize, total: usize },
    /// The last stroke finished; fired once per full drawing
    Complete,
}

/// How one stroke should currently be rendered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeStatus {
    /// Unrevealed guide
    Ghost,
    /// Being revealed; `drawn` units of arc length are visible
    Drawing { drawn: f64 },
    /// Fully drawn
    Done,
}

/// Render snapshot of a single stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeFrame {
    pub index: usize,
    pub status: StrokeStatus,
    pub length: f64,
    pub label: Option<StrokeLabel>,
    pub label_visible: bool,
}

/// Summary of the animator's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorState {
    pub current_stroke: usize,
    pub total_strokes: usize,
    pub is_animating: bool,
    pub is_complete: bool,
}

/// Stroke reveal state machine for one character
#[derive(Debug, Default)]
pub struct StrokeAnimator {
    character: String,
    strokes: Vec<Polyline>,
    labels: Vec<StrokeLabel>,
    current_stroke: usize,
    phase: AnimatorPhase,
    /// Time spent on the stroke being revealed
    elapsed: f64,
    auto_play: bool,
    /// Remaining pause before auto-play draws the next stroke
    gap_remaining: Option<f64>,
    events: Vec<AnimationEvent>,
}

impl StrokeAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a character, showing every stroke as a ghost
    pub fn load(&mut self, record: &KanjiRecord) {
        self.stop();
        self.events.clear();
        self.character = record.character.clone();
        self.strokes = parse_strokes(&record.paths);
        self.labels = record.stroke_nums.clone();
        self.current_stroke = 0;
        self.phase = if self.strokes.is_empty() {
            AnimatorPhase::Complete
        } else {
            AnimatorPhase::Loaded
        };
        debug!(character = %self.character, strokes = self.strokes.len(), "Animator loaded");
        self.fire_progress();
    }

    /// Start revealing the next stroke
    ///
    /// Returns false, changing nothing, while a stroke is animating or once
    /// every stroke is drawn.
    pub fn draw_next(&mut self) -> bool {
        match self.phase {
            AnimatorPhase::Loaded | AnimatorPhase::Idle => {}
            _ => return false,
        }
        self.phase = AnimatorPhase::Animating;
        self.elapsed = 0.0;
        self.gap_remaining = None;
        true
    }

    /// Draw every remaining stroke with a pause between them
    pub fn start_auto_play(&mut self) {
        if self.phase == AnimatorPhase::Animating {
            self.auto_play = true;
            return;
        }
        if self.phase == AnimatorPhase::Complete {
            self.reset();
        }
        self.auto_play = true;
        if !self.draw_next() {
            self.auto_play = false;
        }
    }

    /// Cancel the in-flight reveal and any pending auto-play step
    ///
    /// Already drawn strokes stay drawn. Safe to call when nothing runs.
    pub fn stop(&mut self) {
        self.auto_play = false;
        self.gap_remaining = None;
        if self.phase == AnimatorPhase::Animating {
            self.elapsed = 0.0;
            self.phase =
                if self.current_stroke == 0 { AnimatorPhase::Loaded } else { AnimatorPhase::Idle };
        }
    }

    /// Return every stroke to its ghost
    pub fn reset(&mut self) {
        self.stop();
        if self.phase == AnimatorPhase::Empty {
            return;
        }
        self.current_stroke = 0;
        self.phase =
            if self.strokes.is_empty() { AnimatorPhase::Complete } else { AnimatorPhase::Loaded };
        self.fire_progress();
    }

    /// Advance time and return the events that fired
    pub fn tick(&mut self, elapsed_ms: f64) -> Vec<AnimationEvent> {
        let mut budget = elapsed_ms.max(0.0);

        loop {
            if self.phase == AnimatorPhase::Animating {
                let needed = ANIM_DURATION_MS - self.elapsed;
                if budget < needed {
                    self.elapsed += budget;
                    break;
                }
                budget -= needed;
                self.finish_stroke();
            } else if let Some(gap) = self.gap_remaining {
                if budget < gap {
                    self.gap_remaining = Some(gap - budget);
                    break;
                }
                budget -= gap;
                self.gap_remaining = None;
                if !self.draw_next() {
                    self.auto_play = false;
                    break;
                }
            } else {
                break;
            }
        }

        self.take_events()
    }

    /// Events fired since the last call
    pub fn take_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> AnimatorState {
        AnimatorState {
            current_stroke: self.current_stroke,
            total_strokes: self.strokes.len(),
            is_animating: self.phase == AnimatorPhase::Animating,
            is_complete: self.phase == AnimatorPhase::Complete,
        }
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn strokes(&self) -> &[Polyline] {
        &self.strokes
    }

    /// Per-stroke render snapshot
    pub fn frame(&self) -> Vec<StrokeFrame> {
        self.strokes
            .iter()
            .enumerate()
            .map(|(index, stroke)| {
                let status = if index < self.current_stroke {
                    StrokeStatus::Done
                } else if index == self.current_stroke && self.phase == AnimatorPhase::Animating {
                    let eased = ease_out_cubic(self.elapsed / ANIM_DURATION_MS);
                    StrokeStatus::Drawing { drawn: stroke.length() * eased }
                } else {
                    StrokeStatus::Ghost
                };
                StrokeFrame {
                    index,
                    status,
                    length: stroke.length(),
                    label: self.labels.get(index).copied(),
                    label_visible: status == StrokeStatus::Done,
                }
            })
            .collect()
    }

    fn finish_stroke(&mut self) {
        self.elapsed = 0.0;
        self.current_stroke += 1;
        self.fire_progress();

        if self.current_stroke >= self.strokes.len() {
            self.phase = AnimatorPhase::Complete;
            self.auto_play = false;
            self.gap_remaining = None;
            debug!(character = %self.character, "Stroke animation complete");
            self.events.push(AnimationEvent::Complete);
        } else {
            self.phase = AnimatorPhase::Idle;
            if self.auto_play {
                self.gap_remaining = Some(STROKE_GAP_MS);
            }
        }
    }

    fn fire_progress(&mut self) {
        self.events.push(AnimationEvent::Progress {
            current: self.current_stroke,
            total: self.strokes.len(),
        });
    }
}
