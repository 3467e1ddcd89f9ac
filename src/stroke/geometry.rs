//! Stroke path geometry
//!
//! KanjiVG stroke paths are SVG path descriptors on a 109x109 canvas. They are
//! parsed with usvg, flattened into polylines, and measured so a reveal can be
//! expressed as "draw the first N units of the path".

use resvg::usvg::{self, Node, tiny_skia_path::PathSegment};
use tracing::warn;

/// Width and height of the KanjiVG canvas
pub const CANVAS_SIZE: f64 = 109.0;

/// Line segments used to approximate each curve
const CURVE_STEPS: usize = 12;

/// A point on the stroke canvas (y grows downward, as in SVG)
pub type Point = (f64, f64);

/// A stroke flattened into straight segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    length: f64,
}

impl Polyline {
    pub fn from_points(points: Vec<Point>) -> Self {
        let length = points.windows(2).map(|w| distance(w[0], w[1])).sum();
        Self { points, length }
    }

    /// Parse one SVG path descriptor
    ///
    /// Unparseable data yields an empty polyline rather than an error so a
    /// single bad stroke does not prevent the rest of the character drawing.
    pub fn parse(path_data: &str) -> Self {
        match parse_points(path_data) {
            Some(points) => Self::from_points(points),
            None => {
                warn!(path = path_data, "Could not parse stroke path");
                Self::default()
            }
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The leading part of the stroke up to `drawn` units of arc length
    pub fn prefix(&self, drawn: f64) -> Vec<Point> {
        if drawn >= self.length {
            return self.points.clone();
        }
        let mut out = Vec::new();
        let Some(&first) = self.points.first() else {
            return out;
        };
        out.push(first);
        if drawn <= 0.0 {
            return out;
        }

        let mut remaining = drawn;
        for w in self.points.windows(2) {
            let seg = distance(w[0], w[1]);
            if seg >= remaining {
                let t = if seg > 0.0 { remaining / seg } else { 0.0 };
                out.push((w[0].0 + (w[1].0 - w[0].0) * t, w[0].1 + (w[1].1 - w[0].1) * t));
                break;
            }
            remaining -= seg;
            out.push(w[1]);
        }
        out
    }
}

/// Flatten every stroke of a character
pub fn parse_strokes(paths: &[String]) -> Vec<Polyline> {
    paths.iter().map(|p| Polyline::parse(p)).collect()
}

fn distance(a: Point, b: Point) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn parse_points(path_data: &str) -> Option<Vec<Point>> {
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}"><path d="{data}" fill="none" stroke="black"/></svg>"#,
        size = CANVAS_SIZE,
        data = path_data.replace('"', ""),
    );
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).ok()?;

    let mut points = Vec::new();
    collect_points(tree.root(), &mut points);
    if points.is_empty() { None } else { Some(points) }
}

fn collect_points(group: &usvg::Group, out: &mut Vec<Point>) {
    for node in group.children() {
        match node {
            Node::Group(child) => collect_points(child, out),
            Node::Path(path) => flatten(path.data().segments(), out),
            _ => {}
        }
    }
}

fn flatten(segments: impl Iterator<Item = PathSegment>, out: &mut Vec<Point>) {
    let mut current: Point = (0.0, 0.0);
    let mut start: Point = (0.0, 0.0);

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => {
                current = (p.x as f64, p.y as f64);
                start = current;
                out.push(current);
            }
            PathSegment::LineTo(p) => {
                current = (p.x as f64, p.y as f64);
                out.push(current);
            }
            PathSegment::QuadTo(c, p) => {
                let c = (c.x as f64, c.y as f64);
                let end = (p.x as f64, p.y as f64);
                for i in 1..=CURVE_STEPS {
                    let t = i as f64 / CURVE_STEPS as f64;
                    let mt = 1.0 - t;
                    out.push((
                        mt * mt * current.0 + 2.0 * mt * t * c.0 + t * t * end.0,
                        mt * mt * current.1 + 2.0 * mt * t * c.1 + t * t * end.1,
                    ));
                }
                current = end;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let c1 = (c1.x as f64, c1.y as f64);
                let c2 = (c2.x as f64, c2.y as f64);
                let end = (p.x as f64, p.y as f64);
                for i in 1..=CURVE_STEPS {
                    let t = i as f64 / CURVE_STEPS as f64;
                    let mt = 1.0 - t;
                    out.push((
                        mt.powi(3) * current.0
                            + 3.0 * mt * mt * t * c1.0
                            + 3.0 * mt * t * t * c2.0
                            + t.powi(3) * end.0,
                        mt.powi(3) * current.1
                            + 3.0 * mt * mt * t * c1.1
                            + 3.0 * mt * t * t * c2.1
                            + t.powi(3) * end.1,
                    ));
                }
                current = end;
            }
            PathSegment::Close => {
                current = start;
                out.push(current);
            }
        }
    }
}
