//! Point reduction for freehand strokes.

use kurbo::Point;

/// Simplify a polyline with the given tolerance.
///
/// Runs a radial-distance pass to drop clustered samples, then
/// Ramer-Douglas-Peucker on what remains. The first and last points are
/// always kept and the output never has more points than the input.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 || tolerance.is_nan() || tolerance <= 0.0 {
        return points.to_vec();
    }

    let sq_tolerance = tolerance * tolerance;
    let reduced = radial_distance(points, sq_tolerance);
    rdp_simplify(&reduced, sq_tolerance)
}

/// Drop points closer than the tolerance to the last kept point.
fn radial_distance(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let mut kept = Vec::with_capacity(points.len());
    let mut prev = points[0];
    let mut prev_index = 0;
    kept.push(prev);

    for (i, &point) in points.iter().enumerate().skip(1) {
        if (point - prev).hypot2() > sq_tolerance {
            kept.push(point);
            prev = point;
            prev_index = i;
        }
    }

    if prev_index != points.len() - 1 {
        kept.push(points[points.len() - 1]);
    }

    kept
}

/// Ramer-Douglas-Peucker line simplification.
fn rdp_simplify(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut simplified = vec![points[0]];
    rdp_step(points, 0, last, sq_tolerance, &mut simplified);
    simplified.push(points[last]);
    simplified
}

fn rdp_step(points: &[Point], first: usize, last: usize, sq_tolerance: f64, out: &mut Vec<Point>) {
    let mut max_sq_dist = sq_tolerance;
    let mut max_index = None;

    for i in first + 1..last {
        let sq_dist = segment_distance_sq(points[i], points[first], points[last]);
        if sq_dist > max_sq_dist {
            max_sq_dist = sq_dist;
            max_index = Some(i);
        }
    }

    if let Some(index) = max_index {
        if index - first > 1 {
            rdp_step(points, first, index, sq_tolerance, out);
        }
        out.push(points[index]);
        if last - index > 1 {
            rdp_step(points, index, last, sq_tolerance, out);
        }
    }
}

/// Squared distance from a point to a segment.
fn segment_distance_sq(point: Point, start: Point, end: Point) -> f64 {
    let segment = end - start;
    let len_sq = segment.hypot2();
    if len_sq < f64::EPSILON {
        // Segment is a point
        return (point - start).hypot2();
    }

    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    let projection = start + segment * t;
    (point - projection).hypot2()
}
