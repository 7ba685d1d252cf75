//! Vector path construction for freehand strokes.
//!
//! Raw touch samples go in, an SVG path data string comes out. Construction
//! is a pure function of the points and the simplification settings, so the
//! same stroke always renders the same way.

mod simplify;

pub use simplify::simplify;

use crate::color::SerializableColor;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Default simplification tolerance.
pub const DEFAULT_SIMPLIFY_AMOUNT: f64 = 1.0;

/// Path simplification settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyOptions {
    /// Simplify committed strokes.
    pub simplify_paths: bool,
    /// Simplify the stroke currently being drawn.
    ///
    /// Off by default: simplifying a point set that is still growing makes
    /// the live preview jump around.
    pub simplify_current_path: bool,
    /// Simplification tolerance in canvas units.
    pub amount: f64,
    /// Floor sample coordinates to whole numbers.
    pub round_points: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            simplify_paths: true,
            simplify_current_path: false,
            amount: DEFAULT_SIMPLIFY_AMOUNT,
            round_points: true,
        }
    }
}

impl SimplifyOptions {
    /// Tolerance applied when a stroke is committed.
    pub fn committed_tolerance(&self) -> f64 {
        if self.simplify_paths { self.amount } else { 0.0 }
    }

    /// Tolerance applied to the live preview.
    pub fn live_tolerance(&self) -> f64 {
        if self.simplify_current_path { self.amount } else { 0.0 }
    }

    /// Apply point rounding to a raw sample.
    pub fn prepare_point(&self, point: Point) -> Point {
        if self.round_points { round_point(point) } else { point }
    }
}

/// One committed freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePath {
    /// Stroke color.
    pub color: SerializableColor,
    /// SVG path data.
    pub path: String,
    /// Raw points used to build the path.
    pub data: Vec<Point>,
    /// Stroke width.
    pub thickness: f64,
    /// Stroke opacity in [0, 1].
    pub opacity: f64,
}

impl StrokePath {
    /// Build a stroke from raw points.
    pub fn from_points(
        points: Vec<Point>,
        color: SerializableColor,
        thickness: f64,
        opacity: f64,
        tolerance: f64,
        round_points: bool,
    ) -> Self {
        let path = create_svg_path(&points, tolerance, round_points);
        Self {
            color,
            path,
            data: points,
            thickness,
            opacity,
        }
    }

    /// Parse the stored path data back into a Bézier path.
    pub fn to_bez_path(&self) -> BezPath {
        BezPath::from_svg(&self.path).unwrap_or_default()
    }
}

/// Floor both coordinates.
pub fn round_point(point: Point) -> Point {
    Point::new(point.x.floor(), point.y.floor())
}

/// Build a smooth curve through the points.
///
/// Each interior point becomes the control point of a quadratic segment that
/// ends at the midpoint to the next sample; the path closes with a line to the
/// final sample. Two points give a straight line, fewer give an empty path.
pub fn smooth_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();

    match points {
        [] | [_] => {}
        [start, end] => {
            path.move_to(*start);
            path.line_to(*end);
        }
        [start, .., end] => {
            path.move_to(*start);
            for pair in points[1..].windows(2) {
                path.quad_to(pair[0], pair[0].midpoint(pair[1]));
            }
            path.line_to(*end);
        }
    }

    path
}

/// Create SVG path data from raw points.
///
/// `tolerance` of 0 disables simplification.
pub fn create_svg_path(points: &[Point], tolerance: f64, round_points: bool) -> String {
    if points.len() < 2 {
        return String::new();
    }

    let prepared: Vec<Point> = if round_points {
        points.iter().copied().map(round_point).collect()
    } else {
        points.to_vec()
    };

    let simplified = simplify(&prepared, tolerance);
    smooth_path(&simplified).to_svg()
}
