//! Remediation replay after a wrong stroke answer
//!
//! The reviewer replays every stroke of one character at a chosen speed,
//! keeping the stroke the learner should have picked highlighted. Once the
//! replay settles it waits for the learner to ask for practice.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::animator::ease_out_cubic;
use super::geometry::{Polyline, parse_strokes};
use crate::kanji::StrokeLabel;

/// Pause after the last stroke before practice is offered
pub const SETTLE_MS: f64 = 400.0;

/// Label of the practice action
pub const PRACTICE_LABEL: &str = "3回なぞってみよう";

/// Replay speed preset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Normal, Speed::Fast];

    /// Time to sweep one stroke
    pub fn stroke_ms(self) -> f64 {
        match self {
            Speed::Slow => 800.0,
            Speed::Normal => 500.0,
            Speed::Fast => 250.0,
        }
    }

    /// Pause between strokes
    pub fn gap_ms(self) -> f64 {
        match self {
            Speed::Slow => 900.0,
            Speed::Normal => 600.0,
            Speed::Fast => 300.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Speed::Slow => "ゆっくり",
            Speed::Normal => "ふつう",
            Speed::Fast => "はやい",
        }
    }
}

/// What to replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    pub character: String,
    pub paths: Vec<String>,
    pub stroke_nums: Vec<StrokeLabel>,
    /// Stroke to keep highlighted after its sweep
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewPhase {
    #[default]
    Idle,
    Animating,
    /// Replay finished; practice is available
    Waiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    /// The replay settled and practice is offered
    ReadyToPractice,
    /// The learner chose to practice; the reviewer has been torn down
    Memorized,
}

/// Render style of one stroke during review
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewStroke {
    Ghost,
    Sweeping { drawn: f64, highlighted: bool },
    Done,
    Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Sweep { stroke: usize, elapsed: f64 },
    Gap { next: usize, remaining: f64 },
    Settle { remaining: f64 },
}

/// Replays a character's strokes with one highlighted
#[derive(Debug, Default)]
pub struct StrokeReviewer {
    character: String,
    strokes: Vec<Polyline>,
    labels: Vec<StrokeLabel>,
    highlight: Option<usize>,
    speed: Speed,
    phase: ReviewPhase,
    step: Option<Step>,
    /// Strokes fully swept in the current replay
    swept: usize,
}

impl StrokeReviewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tear down any previous review and replay `request` at normal speed
    pub fn start(&mut self, request: ReviewRequest) {
        self.destroy();
        self.character = request.character;
        self.strokes = parse_strokes(&request.paths);
        self.labels = request.stroke_nums;
        self.highlight = request.highlight.filter(|&i| i < self.strokes.len());
        self.speed = Speed::Normal;
        debug!(character = %self.character, highlight = ?self.highlight, "Review started");
        self.play();
    }

    /// Change speed; only honoured while animating, and restarts the replay
    pub fn set_speed(&mut self, speed: Speed) -> bool {
        if self.phase != ReviewPhase::Animating {
            return false;
        }
        self.speed = speed;
        self.play();
        true
    }

    /// Accept the practice action
    ///
    /// Only available while waiting. Tears the reviewer down.
    pub fn practice(&mut self) -> Option<ReviewEvent> {
        if self.phase != ReviewPhase::Waiting {
            return None;
        }
        self.destroy();
        Some(ReviewEvent::Memorized)
    }

    /// Cancel everything and clear the loaded character
    pub fn destroy(&mut self) {
        *self = Self::default();
    }

    /// Advance time and return the events that fired
    pub fn tick(&mut self, elapsed_ms: f64) -> Vec<ReviewEvent> {
        let mut events = Vec::new();
        let mut budget = elapsed_ms.max(0.0);

        while let Some(step) = self.step {
            match step {
                Step::Sweep { stroke, elapsed } => {
                    let needed = self.speed.stroke_ms() - elapsed;
                    if budget < needed {
                        self.step = Some(Step::Sweep { stroke, elapsed: elapsed + budget });
                        break;
                    }
                    budget -= needed;
                    self.swept = stroke + 1;
                    self.step = if self.swept < self.strokes.len() {
                        Some(Step::Gap { next: self.swept, remaining: self.speed.gap_ms() })
                    } else {
                        Some(Step::Settle { remaining: SETTLE_MS })
                    };
                }
                Step::Gap { next, remaining } => {
                    if budget < remaining {
                        self.step = Some(Step::Gap { next, remaining: remaining - budget });
                        break;
                    }
                    budget -= remaining;
                    self.step = Some(Step::Sweep { stroke: next, elapsed: 0.0 });
                }
                Step::Settle { remaining } => {
                    if budget < remaining {
                        self.step = Some(Step::Settle { remaining: remaining - budget });
                        break;
                    }
                    self.step = None;
                    self.phase = ReviewPhase::Waiting;
                    debug!(character = %self.character, "Review waiting for practice");
                    events.push(ReviewEvent::ReadyToPractice);
                }
            }
        }

        events
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn character(&self) -> &str {
        &self.character
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn strokes(&self) -> &[Polyline] {
        &self.strokes
    }

    pub fn labels(&self) -> &[StrokeLabel] {
        &self.labels
    }

    /// Prompt shown above the canvas
    pub fn instruction(&self) -> String {
        match self.phase {
            ReviewPhase::Idle => "書き順を確認しよう".to_string(),
            ReviewPhase::Animating => format!("「{}」の書き順を見てね", self.character),
            ReviewPhase::Waiting => match self.highlight {
                Some(i) => format!("{}画目が正解だったよ！", i + 1),
                None => "書き順を確認できたかな？".to_string(),
            },
        }
    }

    /// Per-stroke style with label visibility
    pub fn frame(&self) -> Vec<(ReviewStroke, bool)> {
        self.strokes
            .iter()
            .enumerate()
            .map(|(index, stroke)| {
                let highlighted = self.highlight == Some(index);
                if index < self.swept {
                    let style = if highlighted { ReviewStroke::Highlight } else { ReviewStroke::Done };
                    return (style, true);
                }
                match self.step {
                    Some(Step::Sweep { stroke: current, elapsed }) if current == index => {
                        let eased = ease_out_cubic(elapsed / self.speed.stroke_ms());
                        (ReviewStroke::Sweeping { drawn: stroke.length() * eased, highlighted }, false)
                    }
                    _ => (ReviewStroke::Ghost, false),
                }
            })
            .collect()
    }

    fn play(&mut self) {
        self.phase = ReviewPhase::Animating;
        self.swept = 0;
        self.step = if self.strokes.is_empty() {
            Some(Step::Settle { remaining: SETTLE_MS })
        } else {
            Some(Step::Sweep { stroke: 0, elapsed: 0.0 })
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(strokes: usize, highlight: Option<usize>) -> ReviewRequest {
        ReviewRequest {
            character: "川".into(),
            paths: (0..strokes).map(|i| format!("M{x},10L{x},90", x = 20 + i * 30)).collect(),
            stroke_nums: Vec::new(),
            highlight,
        }
    }

    fn full_replay(speed: Speed, strokes: usize) -> f64 {
        speed.stroke_ms() * strokes as f64 + speed.gap_ms() * (strokes - 1) as f64 + SETTLE_MS
    }

    #[test]
    fn start_animates_at_normal_speed() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(3, Some(1)));
        assert_eq!(reviewer.phase(), ReviewPhase::Animating);
        assert_eq!(reviewer.speed(), Speed::Normal);
        assert_eq!(reviewer.instruction(), "「川」の書き順を見てね");
    }

    #[test]
    fn replay_ends_waiting_with_highlight_kept() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(3, Some(1)));

        let events = reviewer.tick(full_replay(Speed::Normal, 3) - 1.0);
        assert!(events.is_empty());
        assert_eq!(reviewer.phase(), ReviewPhase::Animating);

        let events = reviewer.tick(1.0);
        assert_eq!(events, vec![ReviewEvent::ReadyToPractice]);
        assert_eq!(reviewer.phase(), ReviewPhase::Waiting);

        let frame = reviewer.frame();
        assert_eq!(frame[0], (ReviewStroke::Done, true));
        assert_eq!(frame[1], (ReviewStroke::Highlight, true));
        assert_eq!(frame[2], (ReviewStroke::Done, true));
        assert_eq!(reviewer.instruction(), "2画目が正解だったよ！");
    }

    #[test]
    fn highlighted_stroke_sweeps_highlighted() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(2, Some(0)));
        reviewer.tick(100.0);
        match reviewer.frame()[0].0 {
            ReviewStroke::Sweeping { highlighted, drawn } => {
                assert!(highlighted);
                assert!(drawn > 0.0);
            }
            other => panic!("expected sweep, got {:?}", other),
        }
    }

    #[test]
    fn set_speed_restarts_replay() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(3, None));
        reviewer.tick(Speed::Normal.stroke_ms() + 10.0);
        assert_eq!(reviewer.frame()[0].0, ReviewStroke::Done);

        assert!(reviewer.set_speed(Speed::Fast));
        assert_eq!(reviewer.frame()[0].0, ReviewStroke::Sweeping { drawn: 0.0, highlighted: false });

        reviewer.tick(full_replay(Speed::Fast, 3));
        assert_eq!(reviewer.phase(), ReviewPhase::Waiting);
    }

    #[test]
    fn set_speed_ignored_outside_animation() {
        let mut reviewer = StrokeReviewer::new();
        assert!(!reviewer.set_speed(Speed::Slow));

        reviewer.start(request(1, None));
        reviewer.tick(full_replay(Speed::Normal, 1));
        assert!(!reviewer.set_speed(Speed::Slow));
        assert_eq!(reviewer.speed(), Speed::Normal);
    }

    #[test]
    fn practice_only_when_waiting() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(2, None));
        assert_eq!(reviewer.practice(), None);

        reviewer.tick(full_replay(Speed::Normal, 2));
        assert_eq!(reviewer.instruction(), "書き順を確認できたかな？");
        assert_eq!(reviewer.practice(), Some(ReviewEvent::Memorized));
        assert_eq!(reviewer.phase(), ReviewPhase::Idle);
        assert!(reviewer.strokes().is_empty());
    }

    #[test]
    fn destroy_is_idempotent_and_stops_timers() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(2, Some(1)));
        reviewer.destroy();
        reviewer.destroy();
        assert!(reviewer.tick(60_000.0).is_empty());
        assert_eq!(reviewer.phase(), ReviewPhase::Idle);
        assert_eq!(reviewer.highlight(), None);
    }

    #[test]
    fn out_of_range_highlight_is_dropped() {
        let mut reviewer = StrokeReviewer::new();
        reviewer.start(request(2, Some(5)));
        assert_eq!(reviewer.highlight(), None);
    }

    #[test]
    fn speed_presets() {
        assert_eq!((Speed::Slow.stroke_ms(), Speed::Slow.gap_ms()), (800.0, 900.0));
        assert_eq!((Speed::Normal.stroke_ms(), Speed::Normal.gap_ms()), (500.0, 600.0));
        assert_eq!((Speed::Fast.stroke_ms(), Speed::Fast.gap_ms()), (250.0, 300.0));
        assert_eq!(serde_json::to_string(&Speed::Fast).unwrap(), "\"fast\"");
    }
}
