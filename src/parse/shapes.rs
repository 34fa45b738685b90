//! Zet SVG basisvormen om naar paddata.
//!
//! `rect`, `circle`, `ellipse`, `line`, `polyline` en `polygon` worden met
//! dezelfde [`PathBuilder`] opgebouwd als `<path>`, zodat de rest van de
//! import maar één soort invoer kent. Lengtes worden zonder eenheden gelezen.

use std::str::FromStr;

use svgtypes::{Length, PointsParser};

use super::path_data::{PathBuilder, PathDataError, SvgPath};
use crate::geom::Point2;

/// Elementen die een vorm tekenen.
pub const SHAPE_ELEMENTS: [&str; 7] = [
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon",
];

/// Bouwt het pad voor een vormelement.
///
/// Geeft `Ok(None)` voor vormen die niets tekenen, zoals een `rect` zonder
/// breedte of een `path` zonder `d`.
///
/// # Errors
/// Geeft `PathDataError` als het `d` attribuut van een `path` ongeldig is.
pub fn shape_to_path(
    name: &str,
    attributes: &[(String, String)],
) -> Result<Option<SvgPath>, PathDataError> {
    let attr = |key: &str| {
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    let number = |key: &str| attr(key).and_then(parse_length);

    let path = match name {
        "path" => match attr("d") {
            Some(data) => Some(SvgPath::parse(data)?),
            None => None,
        },
        "rect" => rect_path(
            number("x").unwrap_or(0.0),
            number("y").unwrap_or(0.0),
            number("width").unwrap_or(0.0),
            number("height").unwrap_or(0.0),
            number("rx"),
            number("ry"),
        ),
        "circle" => {
            let r = number("r").unwrap_or(0.0);
            ellipse_path(
                number("cx").unwrap_or(0.0),
                number("cy").unwrap_or(0.0),
                r,
                r,
            )
        }
        "ellipse" => ellipse_path(
            number("cx").unwrap_or(0.0),
            number("cy").unwrap_or(0.0),
            number("rx").unwrap_or(0.0),
            number("ry").unwrap_or(0.0),
        ),
        "line" => {
            let mut builder = PathBuilder::new();
            builder
                .move_to(Point2::new(
                    number("x1").unwrap_or(0.0),
                    number("y1").unwrap_or(0.0),
                ))
                .line_to(Point2::new(
                    number("x2").unwrap_or(0.0),
                    number("y2").unwrap_or(0.0),
                ));
            Some(builder.finish())
        }
        "polyline" => points_path(attr("points").unwrap_or(""), false),
        "polygon" => points_path(attr("points").unwrap_or(""), true),
        _ => None,
    };

    Ok(path.filter(|p| !p.is_empty()))
}

fn parse_length(text: &str) -> Option<f64> {
    Length::from_str(text.trim())
        .ok()
        .map(|length| length.number)
        .filter(|n| n.is_finite())
}

fn rect_path(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rx: Option<f64>,
    ry: Option<f64>,
) -> Option<SvgPath> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    // een ontbrekende straal neemt de andere over
    let (rx, ry) = match (rx.filter(|r| *r >= 0.0), ry.filter(|r| *r >= 0.0)) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);

    let mut b = PathBuilder::new();
    if rx > 0.0 && ry > 0.0 {
        let (x1, y1) = (x + width, y + height);
        b.move_to(Point2::new(x + rx, y))
            .line_to(Point2::new(x1 - rx, y))
            .arc_to(rx, ry, 0.0, false, true, Point2::new(x1, y + ry))
            .line_to(Point2::new(x1, y1 - ry))
            .arc_to(rx, ry, 0.0, false, true, Point2::new(x1 - rx, y1))
            .line_to(Point2::new(x + rx, y1))
            .arc_to(rx, ry, 0.0, false, true, Point2::new(x, y1 - ry))
            .line_to(Point2::new(x, y + ry))
            .arc_to(rx, ry, 0.0, false, true, Point2::new(x + rx, y))
            .close();
    } else {
        b.move_to(Point2::new(x, y))
            .line_to(Point2::new(x + width, y))
            .line_to(Point2::new(x + width, y + height))
            .line_to(Point2::new(x, y + height))
            .close();
    }
    Some(b.finish())
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> Option<SvgPath> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }

    let mut b = PathBuilder::new();
    b.move_to(Point2::new(cx + rx, cy))
        .arc_to(rx, ry, 0.0, false, true, Point2::new(cx - rx, cy))
        .arc_to(rx, ry, 0.0, false, true, Point2::new(cx + rx, cy))
        .close();
    Some(b.finish())
}

fn points_path(text: &str, closed: bool) -> Option<SvgPath> {
    let mut points = PointsParser::from(text).map(|(x, y)| Point2::new(x, y));
    let first = points.next()?;

    let mut b = PathBuilder::new();
    b.move_to(first);
    for point in points {
        b.line_to(point);
    }
    if closed {
        b.close();
    }
    Some(b.finish())
}

#[cfg(test)]
mod tests {
    use super::shape_to_path;
    use crate::geom::{Point2, Tolerance};
    use crate::parse::path_data::PathSegment;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn plain_rect_is_a_closed_quad() {
        let path = shape_to_path(
            "rect",
            &attrs(&[("x", "0"), ("y", "1"), ("width", "2"), ("height", "3")]),
        )
        .unwrap()
        .unwrap();
        let subpath = &path.continuous_subpaths()[0];
        assert_eq!(subpath.len(), 4);
        assert!(subpath.is_closed(Tolerance::DEFAULT));
        assert_eq!(subpath.start_point(), Some(Point2::new(0.0, 1.0)));
    }

    #[test]
    fn rounded_rect_uses_four_arcs() {
        let path = shape_to_path(
            "rect",
            &attrs(&[("width", "10"), ("height", "4"), ("rx", "3")]),
        )
        .unwrap()
        .unwrap();
        let segments = path.continuous_subpaths()[0].segments();
        let arcs = segments
            .iter()
            .filter(|s| matches!(s, PathSegment::EllipticalArc(_)))
            .count();
        assert_eq!(arcs, 4);
        // ry copies rx, then clamps to half the height
        let PathSegment::EllipticalArc(arc) = segments[1] else {
            panic!("arc expected");
        };
        assert!((arc.radius_y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn circle_is_two_half_arcs() {
        let path = shape_to_path("circle", &attrs(&[("cx", "4"), ("cy", "5"), ("r", "6")]))
            .unwrap()
            .unwrap();
        let subpath = &path.continuous_subpaths()[0];
        assert_eq!(subpath.len(), 2);
        assert!(subpath.is_closed(Tolerance::DEFAULT));
    }

    #[test]
    fn empty_shapes_draw_nothing() {
        assert!(shape_to_path("rect", &attrs(&[("width", "0"), ("height", "3")]))
            .unwrap()
            .is_none());
        assert!(shape_to_path("circle", &attrs(&[("r", "0")])).unwrap().is_none());
        assert!(shape_to_path("polyline", &attrs(&[("points", "")])).unwrap().is_none());
        assert!(shape_to_path("path", &[]).unwrap().is_none());
    }

    #[test]
    fn polygon_closes_and_polyline_stays_open() {
        let points = [("points", "0,0 4,0 4,3")];
        let polygon = shape_to_path("polygon", &attrs(&points)).unwrap().unwrap();
        let polyline = shape_to_path("polyline", &attrs(&points)).unwrap().unwrap();
        assert_eq!(polygon.segment_count(), 3);
        assert_eq!(polyline.segment_count(), 2);
        assert!(polygon.continuous_subpaths()[0].is_closed(Tolerance::DEFAULT));
        assert!(!polyline.continuous_subpaths()[0].is_closed(Tolerance::DEFAULT));
    }

    #[test]
    fn broken_path_data_is_an_error() {
        assert!(shape_to_path("path", &attrs(&[("d", "M 0,0 FFF")])).is_err());
    }
}
