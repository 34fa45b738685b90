use super::core::{DEG2RAD, Point3, Tolerance, Transform, Vec3};

/// Gauss-Legendre nodes and weights on [-1, 1]; exact for polynomials up to degree 9.
const GAUSS_LEGENDRE_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_08),
    (0.906_179_845_938_664, 0.236_926_885_056_189_08),
];

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = 1e-6 * span.abs();
        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    /// Contribution of this curve to the signed area of a closed planar loop
    /// in the XY plane (Green's theorem, `½∮ x dy − y dx`).
    #[must_use]
    fn signed_area_contribution(&self) -> f64 {
        let (a, b) = self.domain();
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        let integral: f64 = GAUSS_LEGENDRE_5
            .iter()
            .map(|&(node, weight)| {
                let t = mid + half * node;
                let p = self.point_at(t);
                let d = self.derivative_at(t);
                weight * (p.x * d.y - p.y * d.x)
            })
            .sum();
        0.5 * integral * half
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        let dir = self.direction();
        self.start.add_vec(dir.mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec3 {
        self.direction()
    }

    fn signed_area_contribution(&self) -> f64 {
        0.5 * (self.start.x * self.end.y - self.end.x * self.start.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
}

impl QuadraticBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self { p0, p1, p2 }
    }
}

impl Curve3 for QuadraticBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        point_weighted_sum(&[(self.p0, u * u), (self.p1, 2.0 * u * t), (self.p2, t * t)])
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        a.mul_scalar(2.0 * u).add(b.mul_scalar(2.0 * t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        point_weighted_sum(&[
            (self.p0, u2 * u),
            (self.p1, 3.0 * u2 * t),
            (self.p2, 3.0 * u * t2),
            (self.p3, t2 * t),
        ])
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        let c = self.p3.sub_point(self.p2);
        a.mul_scalar(3.0 * u * u)
            .add(b.mul_scalar(6.0 * u * t))
            .add(c.mul_scalar(3.0 * t * t))
    }
}

/// Sense in which an arc sweeps from its start angle to its end angle,
/// seen from +Z looking down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngularDirection {
    CounterClockwise,
    Clockwise,
}

impl AngularDirection {
    /// Direction that reproduces a signed sweep: non-negative sweeps run counter-clockwise.
    #[must_use]
    pub fn from_sweep(sweep: f64) -> Self {
        if sweep >= 0.0 {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }
}

/// A portion of an ellipse, `center + x_axis·rx·cos(θ) + y_axis·ry·sin(θ)`
/// for θ from `start_angle` to `start_angle + sweep_angle` (radians).
///
/// `x_axis` and `y_axis` are perpendicular after construction and after any
/// rigid motion or mirror. A general affine map keeps them as conjugate
/// directions, which still describes the mapped arc exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseArc3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl EllipseArc3 {
    /// Arc in the XY plane between two angles given in degrees.
    ///
    /// The sweep follows `direction` from `start_deg` to `end_deg`. The angle
    /// order is never swapped, so 180° → 90° clockwise is a quarter turn while
    /// 180° → 90° counter-clockwise is three quarters.
    #[must_use]
    pub fn from_angles(
        center: Point3,
        radius_x: f64,
        radius_y: f64,
        start_deg: f64,
        end_deg: f64,
        direction: AngularDirection,
    ) -> Self {
        let sweep_deg = sweep_between(start_deg, end_deg, direction);
        Self {
            center,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            radius_x,
            radius_y,
            start_angle: start_deg * DEG2RAD,
            sweep_angle: sweep_deg * DEG2RAD,
        }
    }

    #[must_use]
    pub fn direction(&self) -> AngularDirection {
        AngularDirection::from_sweep(self.sweep_angle)
    }

    fn semi_axes(&self) -> (Vec3, Vec3) {
        (
            self.x_axis.mul_scalar(self.radius_x),
            self.y_axis.mul_scalar(self.radius_y),
        )
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.start_angle + self.sweep_angle * t.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        let (a, b) = self.semi_axes();
        let a = transform.apply_vec(a);
        let b = transform.apply_vec(b);
        let radius_x = a.length();
        let radius_y = b.length();
        Self {
            center: transform.apply_point(self.center),
            x_axis: a.normalized().unwrap_or(Vec3::X),
            y_axis: b.normalized().unwrap_or(Vec3::Y),
            radius_x,
            radius_y,
            start_angle: self.start_angle,
            sweep_angle: self.sweep_angle,
        }
    }
}

impl Curve3 for EllipseArc3 {
    fn point_at(&self, t: f64) -> Point3 {
        let angle = self.angle_at(t);
        let (a, b) = self.semi_axes();
        self.center
            .add_vec(a.mul_scalar(angle.cos()))
            .add_vec(b.mul_scalar(angle.sin()))
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let angle = self.angle_at(t);
        let (a, b) = self.semi_axes();
        a.mul_scalar(-angle.sin())
            .add(b.mul_scalar(angle.cos()))
            .mul_scalar(self.sweep_angle)
    }

    fn is_closed(&self) -> bool {
        (self.sweep_angle.abs() - std::f64::consts::TAU).abs() < Tolerance::DEFAULT.eps
    }

    /// Closed form of `½∫ P × P' dθ`: the chord term about the center plus
    /// the swept sector `½·Δθ·(a × b)`.
    fn signed_area_contribution(&self) -> f64 {
        let (a, b) = self.semi_axes();
        let c = self.center;
        let p0 = self.point_at(0.0);
        let p1 = self.point_at(1.0);
        let chord_x = p1.x - p0.x;
        let chord_y = p1.y - p0.y;
        let sector = a.x * b.y - a.y * b.x;
        0.5 * (c.x * chord_y - c.y * chord_x + self.sweep_angle * sector)
    }
}

/// Signed sweep in degrees from `start` to `end` in the given direction.
///
/// A zero raw difference stays zero; a non-zero multiple of 360 becomes a full turn.
#[must_use]
pub fn sweep_between(start: f64, end: f64, direction: AngularDirection) -> f64 {
    let raw = end - start;
    match direction {
        AngularDirection::CounterClockwise => {
            let sweep = raw.rem_euclid(360.0);
            if sweep == 0.0 && raw != 0.0 { 360.0 } else { sweep }
        }
        AngularDirection::Clockwise => {
            let sweep = (-raw).rem_euclid(360.0);
            if sweep == 0.0 && raw != 0.0 { -360.0 } else { -sweep }
        }
    }
}

#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    (0..=steps)
        .map(|i| {
            if i == steps {
                curve.point_at(t1)
            } else {
                curve.point_at(t0 + span * (i as f64 / steps as f64))
            }
        })
        .collect()
}

/// Approximate arc length from a uniform polyline sampling.
#[must_use]
pub fn curve_arc_length(curve: &impl Curve3, samples: usize) -> f64 {
    tessellate_curve_uniform(curve, samples)
        .windows(2)
        .map(|pair| pair[1].distance_to(pair[0]))
        .sum()
}

fn point_weighted_sum(terms: &[(Point3, f64)]) -> Point3 {
    terms
        .iter()
        .fold(Point3::ORIGIN, |acc, &(p, w)| {
            Point3::new(acc.x + p.x * w, acc.y + p.y * w, acc.z + p.z * w)
        })
}
