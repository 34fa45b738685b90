//! Adaptive curve tessellation.
//!
//! Curves are split until every piece stays within a chord-height deviation
//! of the true curve, instead of using a fixed number of steps. Straight
//! pieces stay a single chord no matter how long they are.
//!
//! ```ignore
//! use svg_engine::geom::{CurveTessellationOptions, tessellate_curve_adaptive_points};
//!
//! let options = CurveTessellationOptions::new(1e-3, 4096);
//! let points = tessellate_curve_adaptive_points(&arc, options);
//! ```

use super::core::Point3;
use super::curve::{Curve3, tessellate_curve_uniform};

/// Pieces the domain is cut into before refinement starts. Four keeps a
/// symmetric curve (a full circle) from hiding its bulge between samples.
const INITIAL_SEGMENTS: usize = 4;

/// Fractions of a piece sampled when measuring its deviation.
const DEVIATION_SAMPLES: [f64; 3] = [0.25, 0.5, 0.75];

/// Options for [`tessellate_curve_adaptive_points`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTessellationOptions {
    /// Maximum chord height between the polyline and the curve. Non-finite
    /// or non-positive values fall back to uniform sampling.
    pub max_deviation: f64,
    /// Cap on the number of output segments.
    pub max_segments: usize,
    /// Maximum number of halvings of an initial piece.
    pub max_depth: usize,
}

impl Default for CurveTessellationOptions {
    fn default() -> Self {
        Self {
            max_deviation: 0.01,
            max_segments: 1024,
            max_depth: 16,
        }
    }
}

impl CurveTessellationOptions {
    #[must_use]
    pub const fn new(max_deviation: f64, max_segments: usize) -> Self {
        Self {
            max_deviation,
            max_segments,
            max_depth: 16,
        }
    }
}

/// Polyline through `curve` from its start to its end, both inclusive.
///
/// Every piece is halved while one of its quarter points lies further than
/// `max_deviation` from its chord, until `max_depth` or `max_segments` is hit.
#[must_use]
pub fn tessellate_curve_adaptive_points(
    curve: &impl Curve3,
    options: CurveTessellationOptions,
) -> Vec<Point3> {
    let max_segments = options.max_segments.max(INITIAL_SEGMENTS);
    let max_deviation = options.max_deviation;
    if !max_deviation.is_finite() || max_deviation <= 0.0 {
        return tessellate_curve_uniform(curve, max_segments);
    }

    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() {
        return tessellate_curve_uniform(curve, max_segments);
    }
    if span == 0.0 {
        return vec![curve.point_at(t0)];
    }

    #[derive(Debug, Clone, Copy)]
    struct Piece {
        t0: f64,
        t1: f64,
        p0: Point3,
        p1: Point3,
        depth: usize,
    }

    let params: Vec<f64> = (0..=INITIAL_SEGMENTS)
        .map(|i| {
            if i == INITIAL_SEGMENTS {
                t1
            } else {
                t0 + span * (i as f64 / INITIAL_SEGMENTS as f64)
            }
        })
        .collect();

    // LIFO: the first piece sits on top so points come out in order
    let mut stack: Vec<Piece> = params
        .windows(2)
        .rev()
        .map(|pair| Piece {
            t0: pair[0],
            t1: pair[1],
            p0: curve.point_at(pair[0]),
            p1: curve.point_at(pair[1]),
            depth: 0,
        })
        .collect();

    let mut points = vec![curve.point_at(t0)];
    while let Some(piece) = stack.pop() {
        // emitted segments plus pending pieces, this one included
        let segment_count = points.len() + stack.len();
        let can_split = piece.depth < options.max_depth && segment_count < max_segments;
        if can_split && chord_deviation(curve, piece.t0, piece.t1, piece.p0, piece.p1) > max_deviation
        {
            let tm = 0.5 * (piece.t0 + piece.t1);
            let pm = curve.point_at(tm);
            let depth = piece.depth + 1;
            stack.push(Piece {
                t0: tm,
                t1: piece.t1,
                p0: pm,
                p1: piece.p1,
                depth,
            });
            stack.push(Piece {
                t0: piece.t0,
                t1: tm,
                p0: piece.p0,
                p1: pm,
                depth,
            });
        } else {
            points.push(piece.p1);
        }
    }

    points
}

/// Largest distance from the sampled curve points to the chord `p0..p1`.
fn chord_deviation(curve: &impl Curve3, t0: f64, t1: f64, p0: Point3, p1: Point3) -> f64 {
    DEVIATION_SAMPLES
        .iter()
        .map(|&s| distance_to_chord(curve.point_at(t0 + (t1 - t0) * s), p0, p1))
        .fold(0.0, f64::max)
}

fn distance_to_chord(p: Point3, a: Point3, b: Point3) -> f64 {
    let ab = b.sub_point(a);
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance_to(a);
    }
    let t = (p.sub_point(a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance_to(a.add_vec(ab.mul_scalar(t)))
}
