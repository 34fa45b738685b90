//! Closed planar polygons and the containment tests used for loop nesting.
//!
//! Curved loops are tessellated into a [`Polygon2`] before testing. A
//! polygon with fewer than three distinct points contains nothing and is
//! contained by nothing. Inside means a non-zero winding number.
//!
//! # Example
//! ```ignore
//! use svg_engine::geom::{Point2, Polygon2, Tolerance};
//!
//! let square = |s: f64| Polygon2::new(vec![
//!     Point2::new(-s, -s),
//!     Point2::new(s, -s),
//!     Point2::new(s, s),
//!     Point2::new(-s, s),
//! ]);
//! assert!(square(2.0).contains_polygon(&square(1.0), Tolerance::DEFAULT));
//! ```

use super::core::{BBox, Point2, Point3, Tolerance};

/// A closed loop of planar points. The closing edge from the last point
/// back to the first is implicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon2 {
    points: Vec<Point2>,
}

impl Polygon2 {
    /// Build a polygon, dropping consecutive duplicates and a repeated closing point.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last() != Some(&p) {
                cleaned.push(p);
            }
        }
        while cleaned.len() > 1 && cleaned.first() == cleaned.last() {
            cleaned.pop();
        }
        Self { points: cleaned }
    }

    /// Project 3D points onto the XY plane.
    #[must_use]
    pub fn from_points3(points: &[Point3]) -> Self {
        Self::new(points.iter().map(|p| p.xy()).collect())
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the polygon encloses any area at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || !self.points.iter().all(|p| p.is_finite())
    }

    /// Shoelace area; positive for counter-clockwise loops in a Y-up frame.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        let points: Vec<Point3> = self.points.iter().map(|p| p.to_point3()).collect();
        BBox::from_points(&points)
    }

    /// Point-in-polygon by winding number. Points within `tol` of the
    /// boundary count as inside.
    #[must_use]
    pub fn contains_point(&self, point: Point2, tol: Tolerance) -> bool {
        if self.is_degenerate() {
            return false;
        }
        if self.sides().any(|(a, b)| distance_to_segment(point, a, b) <= tol.eps) {
            return true;
        }
        winding_number(point, self.sides()) != 0
    }

    /// Whether any side of `self` comes within `tol` of any side of `other`.
    #[must_use]
    pub fn intersects(&self, other: &Self, tol: Tolerance) -> bool {
        if self.len() < 2 || other.len() < 2 {
            return false;
        }
        self.sides().any(|(a0, a1)| {
            other
                .sides()
                .any(|(b0, b1)| segments_touch(a0, a1, b0, b1, tol))
        })
    }

    /// Where `inner` sits relative to `self`.
    ///
    /// Boundaries that touch or cross give [`Containment::Touching`]; otherwise
    /// a single vertex of `inner` decides between inside and outside.
    #[must_use]
    pub fn classify(&self, inner: &Self, tol: Tolerance) -> Containment {
        if self.is_degenerate() || inner.is_degenerate() {
            return Containment::Outside;
        }
        let (Some(outer_box), Some(inner_box)) = (self.bounds(), inner.bounds()) else {
            return Containment::Outside;
        };
        if !outer_box.expand_by(tol.eps).overlaps(inner_box) {
            return Containment::Outside;
        }
        if self.intersects(inner, tol) {
            return Containment::Touching;
        }
        match inner.points.first() {
            Some(&vertex) if winding_number(vertex, self.sides()) != 0 => Containment::Inside,
            _ => Containment::Outside,
        }
    }

    /// Whether `inner` lies wholly inside `self` without touching its boundary.
    #[must_use]
    pub fn contains_polygon(&self, inner: &Self, tol: Tolerance) -> bool {
        self.classify(inner, tol) == Containment::Inside
    }

    /// Sides of the closed loop, the closing side last.
    fn sides(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.points
            .iter()
            .copied()
            .zip(self.points.iter().copied().cycle().skip(1))
    }
}

/// Result of [`Polygon2::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    /// The boundaries meet, so the sampled loops cannot tell.
    Touching,
}

fn signed_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        area += a.x * b.y - b.x * a.y;
    }
    0.5 * area
}

/// Twice the signed area of the triangle `o, a, b`.
fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance(Point2::new(a.x + t * dx, a.y + t * dy))
}

/// Proper crossing, or an endpoint of one segment within `tol` of the other.
fn segments_touch(a0: Point2, a1: Point2, b0: Point2, b1: Point2, tol: Tolerance) -> bool {
    let far_apart = a0.x.max(a1.x) + tol.eps < b0.x.min(b1.x)
        || b0.x.max(b1.x) + tol.eps < a0.x.min(a1.x)
        || a0.y.max(a1.y) + tol.eps < b0.y.min(b1.y)
        || b0.y.max(b1.y) + tol.eps < a0.y.min(a1.y);
    if far_apart {
        return false;
    }

    let crosses = cross(a0, a1, b0) * cross(a0, a1, b1) < 0.0
        && cross(b0, b1, a0) * cross(b0, b1, a1) < 0.0;
    crosses
        || distance_to_segment(b0, a0, a1) <= tol.eps
        || distance_to_segment(b1, a0, a1) <= tol.eps
        || distance_to_segment(a0, b0, b1) <= tol.eps
        || distance_to_segment(a1, b0, b1) <= tol.eps
}

/// Non-zero winding number of `p` around the loop formed by `sides`.
fn winding_number(p: Point2, sides: impl Iterator<Item = (Point2, Point2)>) -> i32 {
    let mut winding = 0;
    for (a, b) in sides {
        if a.y <= p.y {
            if b.y > p.y && cross(a, b, p) > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross(a, b, p) < 0.0 {
            winding -= 1;
        }
    }
    winding
}
