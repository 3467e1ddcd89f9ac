//! Stroke canvas drawn with braille dots
//!
//! Stroke coordinates are SVG-style (y down) on a 109 unit square; the
//! ratatui canvas has y up, so every point is flipped on the way in.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        Block,
        canvas::{Canvas, Line as CanvasLine},
    },
};

use crate::kanji::StrokeLabel;
use crate::stroke::geometry::Point;
use crate::stroke::{CANVAS_SIZE, Polyline, ReviewStroke, StrokeAnimator, StrokeReviewer, StrokeStatus};
use crate::theme::Theme;

use super::layout::square;

/// A run of points in one color
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub points: Vec<Point>,
    pub color: Color,
}

/// A stroke number
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: StrokeLabel,
    pub text: String,
    pub color: Color,
}

/// What to paint on one canvas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    pub brushes: Vec<Brush>,
    pub labels: Vec<Label>,
}

impl Sketch {
    fn stroke(&mut self, stroke: &Polyline, color: Color) {
        self.brushes.push(Brush { points: stroke.points().to_vec(), color });
    }

    fn partial(&mut self, stroke: &Polyline, drawn: f64, color: Color) {
        self.brushes.push(Brush { points: stroke.prefix(drawn), color });
    }

    fn label(&mut self, at: Option<&StrokeLabel>, index: usize, color: Color) {
        if let Some(&at) = at {
            self.labels.push(Label { at, text: (index + 1).to_string(), color });
        }
    }
}

/// Snapshot of the stroke-order animator
pub fn animator_sketch(animator: &StrokeAnimator, theme: &Theme) -> Sketch {
    let mut sketch = Sketch::default();
    for (frame, stroke) in animator.frame().iter().zip(animator.strokes()) {
        match frame.status {
            StrokeStatus::Ghost => sketch.stroke(stroke, theme.stroke_ghost),
            StrokeStatus::Drawing { drawn } => {
                sketch.stroke(stroke, theme.stroke_ghost);
                sketch.partial(stroke, drawn, theme.stroke_active);
            }
            StrokeStatus::Done => sketch.stroke(stroke, theme.stroke_done),
        }
        if frame.label_visible {
            sketch.label(frame.label.as_ref(), frame.index, theme.stroke_label);
        }
    }
    sketch
}

/// Snapshot of a review replay
pub fn reviewer_sketch(reviewer: &StrokeReviewer, theme: &Theme) -> Sketch {
    let mut sketch = Sketch::default();
    let labels = reviewer.labels();
    for (index, ((style, label_visible), stroke)) in
        reviewer.frame().into_iter().zip(reviewer.strokes()).enumerate()
    {
        match style {
            ReviewStroke::Ghost => sketch.stroke(stroke, theme.stroke_ghost),
            ReviewStroke::Sweeping { drawn, highlighted } => {
                let color = if highlighted { theme.stroke_highlight } else { theme.stroke_active };
                sketch.stroke(stroke, theme.stroke_ghost);
                sketch.partial(stroke, drawn, color);
            }
            ReviewStroke::Done => sketch.stroke(stroke, theme.stroke_done),
            ReviewStroke::Highlight => sketch.stroke(stroke, theme.stroke_highlight),
        }
        if label_visible {
            let color = if style == ReviewStroke::Highlight {
                theme.stroke_highlight
            } else {
                theme.stroke_label
            };
            sketch.label(labels.get(index), index, color);
        }
    }
    sketch
}

/// Whole character with one stroke picked out, for "which stroke" questions
pub fn picker_sketch(strokes: &[Polyline], selected: usize, theme: &Theme) -> Sketch {
    let mut sketch = Sketch::default();
    for (index, stroke) in strokes.iter().enumerate() {
        if index != selected {
            sketch.stroke(stroke, theme.stroke_done);
        }
    }
    // Drawn last so it sits on top
    if let Some(stroke) = strokes.get(selected) {
        sketch.stroke(stroke, theme.stroke_highlight);
    }
    sketch
}

/// Paint `sketch` into the largest square that fits `area`
pub fn draw(frame: &mut Frame, area: Rect, block: Block, sketch: &Sketch, theme: &Theme) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let area = square(inner);

    let guide = theme.canvas_guide;
    let mid = CANVAS_SIZE / 2.0;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(theme.bg_secondary)
        .x_bounds([0.0, CANVAS_SIZE])
        .y_bounds([0.0, CANVAS_SIZE])
        .paint(|ctx| {
            ctx.draw(&CanvasLine::new(mid, 0.0, mid, CANVAS_SIZE, guide));
            ctx.draw(&CanvasLine::new(0.0, mid, CANVAS_SIZE, mid, guide));
            ctx.layer();

            for brush in &sketch.brushes {
                for pair in brush.points.windows(2) {
                    let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                    ctx.draw(&CanvasLine::new(
                        x1,
                        CANVAS_SIZE - y1,
                        x2,
                        CANVAS_SIZE - y2,
                        brush.color,
                    ));
                }
            }
            for label in &sketch.labels {
                ctx.print(
                    label.at.x,
                    CANVAS_SIZE - label.at.y,
                    Span::styled(label.text.clone(), Style::default().fg(label.color)),
                );
            }
        });
    frame.render_widget(canvas, area);
}
