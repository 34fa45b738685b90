//! Edges: single curve primitives with a record of where they came from.
//!
//! An [`Edge`] wraps one of the kernel curves and stores an [`EdgeOrigin`]
//! set at construction time. The origin is a plain value (a segment index or
//! a connector marker), so edges never own or borrow their source path.

use super::core::{Axis, BBox, DEG2RAD, Point3, Tolerance, Transform};
use super::curve::{
    AngularDirection, CubicBezier3, Curve3, EllipseArc3, Line3, QuadraticBezier3,
    curve_arc_length,
};
use super::tessellation::{CurveTessellationOptions, tessellate_curve_adaptive_points};

/// The source an edge was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Built from the path segment at this index of its subpath.
    Segment(usize),
    /// Straight connector synthesized to bridge a gap or close a loop.
    Connector,
    /// Constructed directly through the kernel API.
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeGeometry {
    Line(Line3),
    QuadraticBezier(QuadraticBezier3),
    CubicBezier(CubicBezier3),
    EllipseArc(EllipseArc3),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    geometry: EdgeGeometry,
    origin: EdgeOrigin,
}

impl Edge {
    #[must_use]
    pub const fn new(geometry: EdgeGeometry, origin: EdgeOrigin) -> Self {
        Self { geometry, origin }
    }

    #[must_use]
    pub const fn make_line(start: Point3, end: Point3) -> Self {
        Self::new(EdgeGeometry::Line(Line3::new(start, end)), EdgeOrigin::Free)
    }

    #[must_use]
    pub const fn make_quadratic_bezier(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self::new(
            EdgeGeometry::QuadraticBezier(QuadraticBezier3::new(p0, p1, p2)),
            EdgeOrigin::Free,
        )
    }

    #[must_use]
    pub const fn make_cubic_bezier(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self::new(
            EdgeGeometry::CubicBezier(CubicBezier3::new(p0, p1, p2, p3)),
            EdgeOrigin::Free,
        )
    }

    /// Elliptical arc in the XY plane with axes along X and Y.
    /// Angles are in degrees; see [`EllipseArc3::from_angles`].
    #[must_use]
    pub fn make_ellipse_arc(
        center: Point3,
        radius_x: f64,
        radius_y: f64,
        start_deg: f64,
        end_deg: f64,
        direction: AngularDirection,
    ) -> Self {
        Self::new(
            EdgeGeometry::EllipseArc(EllipseArc3::from_angles(
                center, radius_x, radius_y, start_deg, end_deg, direction,
            )),
            EdgeOrigin::Free,
        )
    }

    /// Connector line between two points.
    #[must_use]
    pub const fn connector(start: Point3, end: Point3) -> Self {
        Self::new(EdgeGeometry::Line(Line3::new(start, end)), EdgeOrigin::Connector)
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: EdgeOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub const fn geometry(&self) -> &EdgeGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn origin(&self) -> EdgeOrigin {
        self.origin
    }

    #[must_use]
    pub const fn is_connector(&self) -> bool {
        matches!(self.origin, EdgeOrigin::Connector)
    }

    /// Exact first point: the defining start point, not an evaluation.
    #[must_use]
    pub fn start_point(&self) -> Point3 {
        match &self.geometry {
            EdgeGeometry::Line(line) => line.start,
            EdgeGeometry::QuadraticBezier(curve) => curve.p0,
            EdgeGeometry::CubicBezier(curve) => curve.p0,
            EdgeGeometry::EllipseArc(arc) => arc.point_at(0.0),
        }
    }

    /// Exact last point: the defining end point, not an evaluation.
    #[must_use]
    pub fn end_point(&self) -> Point3 {
        match &self.geometry {
            EdgeGeometry::Line(line) => line.end,
            EdgeGeometry::QuadraticBezier(curve) => curve.p2,
            EdgeGeometry::CubicBezier(curve) => curve.p3,
            EdgeGeometry::EllipseArc(arc) => arc.point_at(1.0),
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        match &self.geometry {
            EdgeGeometry::Line(line) => line.point_at(t),
            EdgeGeometry::QuadraticBezier(curve) => curve.point_at(t),
            EdgeGeometry::CubicBezier(curve) => curve.point_at(t),
            EdgeGeometry::EllipseArc(arc) => arc.point_at(t),
        }
    }

    /// Rotate about `axis` by `angle_deg` degrees.
    #[must_use]
    pub fn rotate(&self, axis: Axis, angle_deg: f64) -> Self {
        match Transform::rotate_about(axis, angle_deg * DEG2RAD) {
            Some(rotation) => self.transformed(rotation),
            None => *self,
        }
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        let p = |point: Point3| transform.apply_point(point);
        let geometry = match &self.geometry {
            EdgeGeometry::Line(line) => EdgeGeometry::Line(Line3::new(p(line.start), p(line.end))),
            EdgeGeometry::QuadraticBezier(c) => {
                EdgeGeometry::QuadraticBezier(QuadraticBezier3::new(p(c.p0), p(c.p1), p(c.p2)))
            }
            EdgeGeometry::CubicBezier(c) => EdgeGeometry::CubicBezier(CubicBezier3::new(
                p(c.p0),
                p(c.p1),
                p(c.p2),
                p(c.p3),
            )),
            EdgeGeometry::EllipseArc(arc) => EdgeGeometry::EllipseArc(arc.transformed(transform)),
        };
        Self::new(geometry, self.origin)
    }

    /// A usable edge has finite coordinates and does not collapse to a point.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let tol = Tolerance::ZERO_LENGTH;
        match &self.geometry {
            EdgeGeometry::Line(line) => {
                line.start.is_finite()
                    && line.end.is_finite()
                    && !tol.approx_eq_point3(line.start, line.end)
            }
            EdgeGeometry::QuadraticBezier(c) => {
                let points = [c.p0, c.p1, c.p2];
                points.iter().all(|p| p.is_finite())
                    && points.iter().any(|&q| !tol.approx_eq_point3(q, c.p0))
            }
            EdgeGeometry::CubicBezier(c) => {
                let points = [c.p0, c.p1, c.p2, c.p3];
                points.iter().all(|p| p.is_finite())
                    && points.iter().any(|&q| !tol.approx_eq_point3(q, c.p0))
            }
            EdgeGeometry::EllipseArc(arc) => {
                arc.center.is_finite()
                    && arc.x_axis.is_finite()
                    && arc.y_axis.is_finite()
                    && arc.radius_x.is_finite()
                    && arc.radius_y.is_finite()
                    && arc.sweep_angle.is_finite()
                    && arc.radius_x > tol.eps
                    && arc.radius_y > tol.eps
                    && arc.sweep_angle.abs() > tol.eps
            }
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match &self.geometry {
            EdgeGeometry::Line(line) => line.direction().length(),
            EdgeGeometry::QuadraticBezier(c) => curve_arc_length(c, 64),
            EdgeGeometry::CubicBezier(c) => curve_arc_length(c, 64),
            EdgeGeometry::EllipseArc(arc) => curve_arc_length(arc, 128),
        }
    }

    /// Green's theorem term of this edge in a closed XY loop.
    #[must_use]
    pub fn signed_area_contribution(&self) -> f64 {
        match &self.geometry {
            EdgeGeometry::Line(line) => line.signed_area_contribution(),
            EdgeGeometry::QuadraticBezier(c) => c.signed_area_contribution(),
            EdgeGeometry::CubicBezier(c) => c.signed_area_contribution(),
            EdgeGeometry::EllipseArc(arc) => arc.signed_area_contribution(),
        }
    }

    /// Polyline through the edge with the default deviation.
    #[must_use]
    pub fn tessellate(&self) -> Vec<Point3> {
        self.tessellate_with(CurveTessellationOptions::default())
    }

    /// Polyline through the edge, from start point to end point inclusive,
    /// within `options.max_deviation` of the curve.
    #[must_use]
    pub fn tessellate_with(&self, options: CurveTessellationOptions) -> Vec<Point3> {
        let mut points = match &self.geometry {
            EdgeGeometry::Line(line) => vec![line.start, line.end],
            EdgeGeometry::QuadraticBezier(c) => tessellate_curve_adaptive_points(c, options),
            EdgeGeometry::CubicBezier(c) => tessellate_curve_adaptive_points(c, options),
            EdgeGeometry::EllipseArc(arc) => tessellate_curve_adaptive_points(arc, options),
        };
        if let Some(first) = points.first_mut() {
            *first = self.start_point();
        }
        if let Some(last) = points.last_mut() {
            *last = self.end_point();
        }
        points
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        BBox::from_points(&self.tessellate())
    }
}
