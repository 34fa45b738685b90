use crate::geom::{Containment, Point2, Polygon2, Tolerance};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon2 {
    Polygon2::new(vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ])
}

#[test]
fn repeated_closing_point_is_dropped() {
    let poly = Polygon2::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 0.0),
    ]);
    assert_eq!(poly.len(), 3);
    assert!(!poly.is_degenerate());
}

#[test]
fn orientation_from_signed_area() {
    let ccw = rect(0.0, 0.0, 2.0, 3.0);
    assert!((ccw.signed_area() - 6.0).abs() < 1e-12);
    assert!(ccw.is_ccw());

    let mut pts = ccw.points().to_vec();
    pts.reverse();
    let cw = Polygon2::new(pts);
    assert!((cw.signed_area() + 6.0).abs() < 1e-12);
    assert!(!cw.is_ccw());
}

#[test]
fn point_containment_includes_boundary() {
    let tol = Tolerance::DEFAULT;
    let square = rect(0.0, 0.0, 4.0, 4.0);
    assert!(square.contains_point(Point2::new(2.0, 2.0), tol));
    assert!(square.contains_point(Point2::new(4.0, 1.0), tol));
    assert!(!square.contains_point(Point2::new(5.0, 1.0), tol));
}

#[test]
fn nested_rectangles_are_contained() {
    let tol = Tolerance::DEFAULT;
    let outer = rect(1.0, 4.0, 16.0, 13.0);
    let inner = rect(2.0, 5.0, 15.0, 12.0);
    assert!(outer.contains_polygon(&inner, tol));
    assert!(!inner.contains_polygon(&outer, tol));
}

#[test]
fn touching_or_crossing_loops_are_not_contained() {
    let tol = Tolerance::DEFAULT;
    let outer = rect(0.0, 0.0, 10.0, 10.0);

    let sharing_edge = rect(0.0, 2.0, 5.0, 5.0);
    assert!(!outer.contains_polygon(&sharing_edge, tol));

    let crossing = rect(5.0, 5.0, 15.0, 6.0);
    assert!(outer.intersects(&crossing, tol));
    assert!(!outer.contains_polygon(&crossing, tol));
}

#[test]
fn disjoint_loops_do_not_contain_each_other() {
    let tol = Tolerance::DEFAULT;
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(3.0, 0.0, 4.0, 1.0);
    assert!(!a.contains_polygon(&b, tol));
    assert!(!b.contains_polygon(&a, tol));
}

#[test]
fn degenerate_polygons_never_nest() {
    let tol = Tolerance::DEFAULT;
    let outer = rect(0.0, 0.0, 10.0, 10.0);
    let sliver = Polygon2::new(vec![Point2::new(1.0, 1.0), Point2::new(1.0, 2.0)]);
    assert!(sliver.is_degenerate());
    assert!(!outer.contains_polygon(&sliver, tol));
    assert!(!sliver.contains_polygon(&outer, tol));
}

#[test]
fn concave_outer_rejects_inner_in_notch() {
    let tol = Tolerance::DEFAULT;
    // U shape opening upwards
    let u = Polygon2::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(9.0, 0.0),
        Point2::new(9.0, 9.0),
        Point2::new(6.0, 9.0),
        Point2::new(6.0, 3.0),
        Point2::new(3.0, 3.0),
        Point2::new(3.0, 9.0),
        Point2::new(0.0, 9.0),
    ]);
    assert!(!u.contains_polygon(&rect(4.0, 5.0, 5.0, 6.0), tol));
    assert!(u.contains_polygon(&rect(1.0, 1.0, 2.0, 2.0), tol));
}

#[test]
fn classify_separates_touching_from_inside() {
    let tol = Tolerance::DEFAULT;
    let outer = rect(0.0, 0.0, 10.0, 10.0);
    assert_eq!(outer.classify(&rect(2.0, 2.0, 3.0, 3.0), tol), Containment::Inside);
    assert_eq!(outer.classify(&rect(0.0, 2.0, 3.0, 3.0), tol), Containment::Touching);
    assert_eq!(outer.classify(&rect(12.0, 2.0, 13.0, 3.0), tol), Containment::Outside);
}

#[test]
fn near_boundary_within_tolerance_touches() {
    let outer = rect(0.0, 0.0, 10.0, 10.0);
    let inner = rect(1e-7, 2.0, 3.0, 3.0);
    assert_eq!(outer.classify(&inner, Tolerance::new(1e-6)), Containment::Touching);
    assert_eq!(outer.classify(&inner, Tolerance::new(1e-9)), Containment::Inside);
}

#[test]
fn winding_ignores_loop_direction() {
    let tol = Tolerance::DEFAULT;
    let mut pts = rect(0.0, 0.0, 4.0, 4.0).points().to_vec();
    pts.reverse();
    let cw = Polygon2::new(pts);
    assert!(cw.contains_point(Point2::new(1.0, 3.0), tol));
    assert!(!cw.contains_point(Point2::new(-1.0, 3.0), tol));
}
