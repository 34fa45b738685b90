//! Wires, faces and the shapes handed back to callers.
//!
//! # Main Types
//! - [`Wire`]: an ordered chain of connected edges, open or closed
//! - [`Face`]: a closed outer wire with closed hole wires
//! - [`Shape`]: either of the two, with label and color metadata
//! - [`GeometryError`]: typed construction failures

use std::fmt;

use serde::Serialize;

use super::core::{BBox, Point3, Tolerance, Transform};
use super::edge::Edge;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while assembling edges into wires and faces.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// No edges were supplied.
    EmptyWire,
    /// Edge `index` does not start where the previous edge ends.
    Disconnected { index: usize, gap: f64 },
    /// A path could not be closed, even after appending a closing line.
    NotClosed { gap: f64 },
    /// A face boundary wire is open.
    OpenBoundary { gap: f64 },
    /// An edge carries NaN or infinite coordinates.
    NonFinite,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWire => write!(f, "cannot make a wire without edges"),
            Self::Disconnected { index, gap } => write!(
                f,
                "edges do not connect into a wire: edge {index} starts {gap:e} away from the previous end"
            ),
            Self::NotClosed { gap } => write!(f, "could not close path (gap {gap:e})"),
            Self::OpenBoundary { gap } => {
                write!(f, "face boundary wire is not closed (gap {gap:e})")
            }
            Self::NonFinite => write!(f, "edge coordinates must be finite"),
        }
    }
}

impl std::error::Error for GeometryError {}

// ============================================================================
// Color
// ============================================================================

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    #[must_use]
    pub const fn to_tuple(self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a)
    }
}

// ============================================================================
// Wire
// ============================================================================

/// An ordered chain of edges where each edge starts where the previous one ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    edges: Vec<Edge>,
    closed: bool,
    pub label: Option<String>,
    pub color: Option<Color>,
}

impl Wire {
    /// Assemble edges in the given order, without reordering or splitting.
    ///
    /// # Errors
    /// Returns `GeometryError` if no edges are given, coordinates are not
    /// finite, or two consecutive edges are further apart than `tol`.
    pub fn make_wire(
        edges: impl IntoIterator<Item = Edge>,
        tol: Tolerance,
    ) -> Result<Self, GeometryError> {
        let edges: Vec<Edge> = edges.into_iter().collect();
        let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
            return Err(GeometryError::EmptyWire);
        };

        if edges
            .iter()
            .any(|edge| !edge.start_point().is_finite() || !edge.end_point().is_finite())
        {
            return Err(GeometryError::NonFinite);
        }

        for (index, pair) in edges.windows(2).enumerate() {
            let gap = pair[0].end_point().distance_to(pair[1].start_point());
            if gap > tol.eps {
                return Err(GeometryError::Disconnected {
                    index: index + 1,
                    gap,
                });
            }
        }

        let closed = last.end_point().distance_to(first.start_point()) <= tol.eps;
        Ok(Self {
            edges,
            closed,
            label: None,
            color: None,
        })
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the last edge ends on the first edge's start, within the
    /// tolerance the wire was built with.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Distinct vertices: one per edge, plus the free end of an open wire.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        if self.closed {
            self.edges.len()
        } else {
            self.edges.len() + 1
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Point3 {
        self.edges
            .first()
            .map_or(Point3::ORIGIN, Edge::start_point)
    }

    #[must_use]
    pub fn end_point(&self) -> Point3 {
        self.edges.last().map_or(Point3::ORIGIN, Edge::end_point)
    }

    /// Distance between the wire's end and its start.
    #[must_use]
    pub fn closure_gap(&self) -> f64 {
        self.end_point().distance_to(self.start_point())
    }

    /// Signed enclosed area in the XY plane; an open wire is closed by its chord.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let along: f64 = self.edges.iter().map(Edge::signed_area_contribution).sum();
        let (s, e) = (self.start_point(), self.end_point());
        along + 0.5 * (e.x * s.y - s.x * e.y)
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.edges.iter().map(Edge::length).sum()
    }

    /// Polyline through all edges, without repeating shared joints.
    #[must_use]
    pub fn tessellate(&self) -> Vec<Point3> {
        let mut points: Vec<Point3> = Vec::new();
        for edge in &self.edges {
            let polyline = edge.tessellate();
            let skip = usize::from(!points.is_empty());
            points.extend(polyline.into_iter().skip(skip));
        }
        points
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        BBox::from_points(&self.tessellate())
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        Self {
            edges: self.edges.iter().map(|e| e.transformed(transform)).collect(),
            closed: self.closed,
            label: self.label.clone(),
            color: self.color,
        }
    }

    /// Reflection across the XZ plane (y → −y).
    #[must_use]
    pub fn mirror(&self) -> Self {
        self.transformed(Transform::mirror_xz())
    }
}

// ============================================================================
// Face
// ============================================================================

/// A planar region: one closed outer wire and any number of closed hole wires.
///
/// Holes are expected to lie inside the outer wire without overlapping each
/// other. This is not verified.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    outer: Wire,
    inners: Vec<Wire>,
    pub label: Option<String>,
    pub color: Option<Color>,
}

impl Face {
    /// # Errors
    /// Returns `GeometryError::OpenBoundary` if any of the wires is open.
    pub fn make_from_wires(outer: Wire, inners: Vec<Wire>) -> Result<Self, GeometryError> {
        if let Some(open) = std::iter::once(&outer)
            .chain(inners.iter())
            .find(|wire| !wire.is_closed())
        {
            return Err(GeometryError::OpenBoundary {
                gap: open.closure_gap(),
            });
        }

        Ok(Self {
            outer,
            inners,
            label: None,
            color: None,
        })
    }

    #[must_use]
    pub fn outer_wire(&self) -> &Wire {
        &self.outer
    }

    #[must_use]
    pub fn inner_wires(&self) -> &[Wire] {
        &self.inners
    }

    /// Enclosed area: the outer area minus the hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.inners.iter().map(|w| w.signed_area().abs()).sum();
        self.outer.signed_area().abs() - holes
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        self.outer.bounding_box()
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        Self {
            outer: self.outer.transformed(transform),
            inners: self.inners.iter().map(|w| w.transformed(transform)).collect(),
            label: self.label.clone(),
            color: self.color,
        }
    }

    /// Reflection across the XZ plane (y → −y).
    #[must_use]
    pub fn mirror(&self) -> Self {
        self.transformed(Transform::mirror_xz())
    }
}

// ============================================================================
// Shape
// ============================================================================

/// One imported item: a filled region or a boundary curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Face(Face),
    Wire(Wire),
}

impl Shape {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Face(face) => face.label.as_deref(),
            Self::Wire(wire) => wire.label.as_deref(),
        }
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Face(face) => face.color,
            Self::Wire(wire) => wire.color,
        }
    }

    pub fn set_label(&mut self, label: Option<String>) {
        match self {
            Self::Face(face) => face.label = label,
            Self::Wire(wire) => wire.label = label,
        }
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        match self {
            Self::Face(face) => face.color = color,
            Self::Wire(wire) => wire.color = color,
        }
    }

    #[must_use]
    pub fn as_face(&self) -> Option<&Face> {
        match self {
            Self::Face(face) => Some(face),
            Self::Wire(_) => None,
        }
    }

    #[must_use]
    pub fn as_wire(&self) -> Option<&Wire> {
        match self {
            Self::Wire(wire) => Some(wire),
            Self::Face(_) => None,
        }
    }

    #[must_use]
    pub fn is_face(&self) -> bool {
        matches!(self, Self::Face(_))
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform) -> Self {
        match self {
            Self::Face(face) => Self::Face(face.transformed(transform)),
            Self::Wire(wire) => Self::Wire(wire.transformed(transform)),
        }
    }

    #[must_use]
    pub fn mirror(&self) -> Self {
        self.transformed(Transform::mirror_xz())
    }
}

impl From<Face> for Shape {
    fn from(face: Face) -> Self {
        Self::Face(face)
    }
}

impl From<Wire> for Shape {
    fn from(wire: Wire) -> Self {
        Self::Wire(wire)
    }
}
