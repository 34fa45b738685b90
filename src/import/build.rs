//! Curve Builder: zet één padsegment om naar een kernel-edge.

use std::vec;

use super::ImportError;
use crate::geom::{AngularDirection, Axis, Edge, EdgeOrigin, Point2, Point3, RAD2DEG};
use crate::parse::path_data::{PathSegment, Subpath, SvgPath};

fn point(p: Point2) -> Point3 {
    p.to_point3()
}

/// Bouwt de kromme voor één segment.
///
/// Bezier-eindpunten worden exact overgenomen. Een boog wordt geconstrueerd
/// in zijn eigen assenstelsel van starthoek naar starthoek plus sweep, in de
/// richting van de sweep, en daarna om zijn middelpunt gedraaid over de
/// x-asrotatie. Start- en eindhoek worden nooit verwisseld.
#[must_use]
pub fn build_curve(segment: &PathSegment) -> Edge {
    match segment {
        PathSegment::Line { start, end } => Edge::make_line(point(*start), point(*end)),
        PathSegment::QuadraticCurve {
            start,
            control,
            end,
        } => Edge::make_quadratic_bezier(point(*start), point(*control), point(*end)),
        PathSegment::CubicCurve {
            start,
            control1,
            control2,
            end,
        } => Edge::make_cubic_bezier(
            point(*start),
            point(*control1),
            point(*control2),
            point(*end),
        ),
        PathSegment::EllipticalArc(arc) => {
            let center = point(arc.center);
            let direction = AngularDirection::from_sweep(arc.sweep_angle);
            let start_deg = arc.start_angle * RAD2DEG;
            let end_deg = (arc.start_angle + arc.sweep_angle) * RAD2DEG;
            Edge::make_ellipse_arc(
                center,
                arc.radius_x,
                arc.radius_y,
                start_deg,
                end_deg,
                direction,
            )
            .rotate(Axis::z_through(center), arc.x_axis_rotation * RAD2DEG)
        }
    }
}

/// Edges van één subpad, met het segmentnummer als herkomst.
pub fn subpath_edges(subpath: &Subpath) -> impl Iterator<Item = Edge> + '_ {
    subpath
        .segments()
        .iter()
        .enumerate()
        .map(|(index, segment)| build_curve(segment).with_origin(EdgeOrigin::Segment(index)))
}

/// Lazy reeks edges over alle subpaden van een pad, zonder gap filling.
///
/// Een parsefout wordt één keer teruggegeven; daarna eindigt de reeks.
#[derive(Debug)]
pub struct EdgesFromPath {
    error: Option<ImportError>,
    subpaths: vec::IntoIter<Subpath>,
    segments: vec::IntoIter<PathSegment>,
    index: usize,
}

impl EdgesFromPath {
    pub(crate) fn new(path: Result<SvgPath, ImportError>) -> Self {
        let (error, subpaths) = match path {
            Ok(path) => (None, path.into_subpaths()),
            Err(err) => (Some(err), Vec::new()),
        };
        Self {
            error,
            subpaths: subpaths.into_iter(),
            segments: Vec::new().into_iter(),
            index: 0,
        }
    }
}

impl Iterator for EdgesFromPath {
    type Item = Result<Edge, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.error.take() {
            return Some(Err(err));
        }
        loop {
            if let Some(segment) = self.segments.next() {
                let index = self.index;
                self.index += 1;
                return Some(Ok(
                    build_curve(&segment).with_origin(EdgeOrigin::Segment(index))
                ));
            }
            let subpath = self.subpaths.next()?;
            self.segments = subpath.into_segments().into_iter();
            self.index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgesFromPath, build_curve};
    use crate::geom::{AngularDirection, EdgeGeometry, EdgeOrigin, Point2, Point3, Tolerance};
    use crate::parse::path_data::{PathSegment, SvgPath};

    fn arc_segment(d: &str) -> PathSegment {
        SvgPath::parse(d).unwrap().continuous_subpaths()[0].segments()[0]
    }

    #[test]
    fn bezier_endpoints_are_bit_exact() {
        let segment = PathSegment::CubicCurve {
            start: Point2::new(0.1, 0.2),
            control1: Point2::new(1.3, 4.4),
            control2: Point2::new(2.7, -3.1),
            end: Point2::new(5.05, 0.15),
        };
        let edge = build_curve(&segment);
        assert_eq!(edge.start_point(), Point3::new(0.1, 0.2, 0.0));
        assert_eq!(edge.end_point(), Point3::new(5.05, 0.15, 0.0));
    }

    #[test]
    fn arcs_reproduce_source_endpoints_for_all_flags() {
        let tol = Tolerance::new(1e-9);
        for d in [
            "M 80 80 A 45 45 0 0 0 125 125",
            "M 230 80 A 45 45 0 1 0 275 125",
            "M 80 230 A 45 45 0 0 1 125 275",
            "M 230 230 A 45 45 0 1 1 275 275",
            "M 172.55 152.45 A 30 50 -45 0 1 215.1 109.9",
        ] {
            let segment = arc_segment(d);
            let edge = build_curve(&segment);
            assert!(
                tol.approx_eq_point3(edge.start_point(), segment.start_point().to_point3()),
                "start of {d}"
            );
            assert!(
                tol.approx_eq_point3(edge.end_point(), segment.end_point().to_point3()),
                "end of {d}"
            );
        }
    }

    #[test]
    fn arc_direction_follows_signed_sweep() {
        let clockwise = build_curve(&arc_segment("M 80 80 A 45 45 0 0 0 125 125"));
        let counter = build_curve(&arc_segment("M 80 230 A 45 45 0 0 1 125 275"));
        let direction = |edge: &crate::geom::Edge| match edge.geometry() {
            EdgeGeometry::EllipseArc(arc) => arc.direction(),
            other => panic!("arc expected, got {other:?}"),
        };
        assert_eq!(direction(&clockwise), AngularDirection::Clockwise);
        assert_eq!(direction(&counter), AngularDirection::CounterClockwise);
    }

    #[test]
    fn large_arc_midpoint_stays_on_the_far_side() {
        let segment = arc_segment("M 230 80 A 45 45 0 1 0 275 125");
        let edge = build_curve(&segment);
        let mid = edge.point_at(0.5);
        let expected = segment.point_at(0.5).to_point3();
        assert!(mid.distance_to(expected) < 1e-9);
    }

    #[test]
    fn edges_carry_their_segment_index() {
        let edges: Vec<_> = EdgesFromPath::new(SvgPath::parse("M 0,0 h 1 v 1 M 5,5 h 1").map_err(Into::into))
            .map(Result::unwrap)
            .collect();
        let origins: Vec<_> = edges.iter().map(|e| e.origin()).collect();
        assert_eq!(
            origins,
            vec![
                EdgeOrigin::Segment(0),
                EdgeOrigin::Segment(1),
                EdgeOrigin::Segment(0)
            ]
        );
    }
}
