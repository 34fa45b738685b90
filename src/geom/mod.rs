mod core;
mod curve;
mod edge;
mod polygon;
mod tessellation;
mod topology;

pub use self::core::{Axis, BBox, DEG2RAD, Point2, Point3, RAD2DEG, Tolerance, Transform, Vec3};
pub use curve::{
    AngularDirection, CubicBezier3, Curve3, EllipseArc3, Line3, QuadraticBezier3,
    curve_arc_length, sweep_between, tessellate_curve_uniform,
};
pub use edge::{Edge, EdgeGeometry, EdgeOrigin};
pub use polygon::{Containment, Polygon2};
pub use tessellation::{CurveTessellationOptions, tessellate_curve_adaptive_points};
pub use topology::{Color, Face, GeometryError, Shape, Wire};

#[cfg(test)]
mod tests;
