//! Parser voor de SVG `d` mini-taal.
//!
//! Relatieve commando's worden omgezet naar absolute segmenten. `H`/`V`
//! worden lijnen, `S`/`T` krijgen het gespiegelde controlepunt en `A` wordt
//! omgerekend naar de middelpuntvorm van een ellipsboog.

use std::f64::consts::TAU;

use svgtypes::PathParser;
use thiserror::Error;

use crate::geom::{Point2, Tolerance, Transform, Vec3};

/// Fout tijdens het parsen van paddata.
#[derive(Debug, Error)]
pub enum PathDataError {
    /// De `d`-string bevat een ongeldig token of commando.
    #[error("ongeldige paddata: {0}")]
    Syntax(#[from] svgtypes::Error),
}

/// Ellipsboog in middelpuntvorm. Hoeken in radialen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    /// Exact beginpunt zoals het in de bron staat.
    pub start: Point2,
    /// Exact eindpunt zoals het in de bron staat.
    pub end: Point2,
    pub center: Point2,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_angle: f64,
    /// Getekende sweep; positief betekent toenemende hoek.
    pub sweep_angle: f64,
    pub x_axis_rotation: f64,
}

impl ArcSegment {
    /// Zet de eindpuntvorm uit de `d`-string om naar middelpuntvorm.
    ///
    /// Geeft `None` als begin- en eindpunt samenvallen; zo'n boog tekent niets.
    /// Te kleine stralen worden opgeschaald zodat de boog beide punten raakt.
    #[must_use]
    pub fn from_endpoints(
        start: Point2,
        end: Point2,
        radius_x: f64,
        radius_y: f64,
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        if start == end {
            return None;
        }

        let phi = x_axis_rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let dx2 = (start.x - end.x) / 2.0;
        let dy2 = (start.y - end.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let mut rx = radius_x.abs();
        let mut ry = radius_y.abs();
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let numerator = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let denominator = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coef = sign * (numerator.max(0.0) / denominator).sqrt();

        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let center = Point2::new(
            cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0,
            sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0,
        );

        let ux = (x1p - cxp) / rx;
        let uy = (y1p - cyp) / ry;
        let vx = (-x1p - cxp) / rx;
        let vy = (-y1p - cyp) / ry;

        let start_angle = uy.atan2(ux);
        let mut sweep_angle = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
        if !sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        } else if sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        }

        Some(Self {
            start,
            end,
            center,
            radius_x: rx,
            radius_y: ry,
            start_angle,
            sweep_angle,
            x_axis_rotation: phi,
        })
    }

    /// Punt op de boog voor `t` in `[0, 1]`; de uiteinden zijn exact.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        if t <= 0.0 {
            return self.start;
        }
        if t >= 1.0 {
            return self.end;
        }
        let angle = self.start_angle + self.sweep_angle * t;
        let (sin_phi, cos_phi) = self.x_axis_rotation.sin_cos();
        let lx = self.radius_x * angle.cos();
        let ly = self.radius_y * angle.sin();
        Point2::new(
            self.center.x + cos_phi * lx - sin_phi * ly,
            self.center.y + sin_phi * lx + cos_phi * ly,
        )
    }

    /// Affiene afbeelding van de boog. Het resultaat is weer een boog.
    ///
    /// De beelden van de twee halve assen zijn geconjugeerde diameters van de
    /// nieuwe ellips; de parameterverschuiving `t0` maakt ze weer loodrecht.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        let (sin_phi, cos_phi) = self.x_axis_rotation.sin_cos();
        let map = |x: f64, y: f64| {
            let v = transform.apply_vec(Vec3::new(x, y, 0.0));
            (v.x, v.y)
        };
        let a = map(self.radius_x * cos_phi, self.radius_x * sin_phi);
        let b = map(-self.radius_y * sin_phi, self.radius_y * cos_phi);

        let dot_ab = a.0 * b.0 + a.1 * b.1;
        let len_a2 = a.0 * a.0 + a.1 * a.1;
        let len_b2 = b.0 * b.0 + b.1 * b.1;
        let t0 = 0.5 * (2.0 * dot_ab).atan2(len_a2 - len_b2);
        let (sin_t0, cos_t0) = t0.sin_cos();

        let u = (a.0 * cos_t0 + b.0 * sin_t0, a.1 * cos_t0 + b.1 * sin_t0);
        let v = (-a.0 * sin_t0 + b.0 * cos_t0, -a.1 * sin_t0 + b.1 * cos_t0);
        let same_orientation = u.0 * v.1 - u.1 * v.0 >= 0.0;

        let (start_angle, sweep_angle) = if same_orientation {
            (self.start_angle - t0, self.sweep_angle)
        } else {
            (-(self.start_angle - t0), -self.sweep_angle)
        };

        Self {
            start: transform.apply_point2(self.start),
            end: transform.apply_point2(self.end),
            center: transform.apply_point2(self.center),
            radius_x: u.0.hypot(u.1),
            radius_y: v.0.hypot(v.1),
            start_angle,
            sweep_angle,
            x_axis_rotation: u.1.atan2(u.0),
        }
    }
}

/// Eén getekend segment met absolute coördinaten in documentruimte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line {
        start: Point2,
        end: Point2,
    },
    QuadraticCurve {
        start: Point2,
        control: Point2,
        end: Point2,
    },
    CubicCurve {
        start: Point2,
        control1: Point2,
        control2: Point2,
        end: Point2,
    },
    EllipticalArc(ArcSegment),
}

impl PathSegment {
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line { start, .. }
            | Self::QuadraticCurve { start, .. }
            | Self::CubicCurve { start, .. } => *start,
            Self::EllipticalArc(arc) => arc.start,
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line { end, .. }
            | Self::QuadraticCurve { end, .. }
            | Self::CubicCurve { end, .. } => *end,
            Self::EllipticalArc(arc) => arc.end,
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        match self {
            Self::Line { start, end } => Point2::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ),
            Self::QuadraticCurve {
                start,
                control,
                end,
            } => {
                let (w0, w1, w2) = (u * u, 2.0 * u * t, t * t);
                Point2::new(
                    w0 * start.x + w1 * control.x + w2 * end.x,
                    w0 * start.y + w1 * control.y + w2 * end.y,
                )
            }
            Self::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => {
                let (w0, w1, w2, w3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                Point2::new(
                    w0 * start.x + w1 * control1.x + w2 * control2.x + w3 * end.x,
                    w0 * start.y + w1 * control1.y + w2 * control2.y + w3 * end.y,
                )
            }
            Self::EllipticalArc(arc) => arc.point_at(t),
        }
    }

    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        let p = |point: Point2| transform.apply_point2(point);
        match self {
            Self::Line { start, end } => Self::Line {
                start: p(*start),
                end: p(*end),
            },
            Self::QuadraticCurve {
                start,
                control,
                end,
            } => Self::QuadraticCurve {
                start: p(*start),
                control: p(*control),
                end: p(*end),
            },
            Self::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => Self::CubicCurve {
                start: p(*start),
                control1: p(*control1),
                control2: p(*control2),
                end: p(*end),
            },
            Self::EllipticalArc(arc) => Self::EllipticalArc(arc.transformed(transform)),
        }
    }
}

/// Een reeks segmenten zonder penlift ertussen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    segments: Vec<PathSegment>,
}

impl Subpath {
    #[must_use]
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2> {
        self.segments.first().map(PathSegment::start_point)
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2> {
        self.segments.last().map(PathSegment::end_point)
    }

    /// Afstand tussen eind- en beginpunt; nul voor een leeg subpad.
    #[must_use]
    pub fn closure_gap(&self) -> f64 {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => end.distance(start),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn is_closed(&self, tol: Tolerance) -> bool {
        self.closure_gap() <= tol.eps
    }

    /// Sluit het subpad met een rechte lijn als eind en begin verder dan
    /// `tol` uit elkaar liggen. Geeft `false` als het pad daarna nog open is.
    pub fn close(&mut self, tol: Tolerance) -> bool {
        if let (Some(start), Some(end)) = (self.start_point(), self.end_point()) {
            if end.distance(start) > tol.eps {
                self.segments.push(PathSegment::Line { start: end, end: start });
            }
        }
        self.is_closed(tol)
    }

    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self::new(self.segments.iter().map(|s| s.transformed(transform)).collect())
    }
}

/// Een volledig geparst pad: één of meer subpaden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgPath {
    subpaths: Vec<Subpath>,
}

impl SvgPath {
    /// Parse een `d`-attribuut.
    ///
    /// # Errors
    /// Geeft `PathDataError::Syntax` bij het eerste ongeldige token.
    pub fn parse(data: &str) -> Result<Self, PathDataError> {
        let mut builder = PathBuilder::new();
        let mut last_cubic: Option<Point2> = None;
        let mut last_quad: Option<Point2> = None;

        for segment in PathParser::from(data) {
            let segment = segment?;
            let current = builder.current();
            let resolve = |abs: bool, x: f64, y: f64| {
                if abs {
                    Point2::new(x, y)
                } else {
                    Point2::new(current.x + x, current.y + y)
                }
            };

            let mut next_cubic = None;
            let mut next_quad = None;
            match segment {
                svgtypes::PathSegment::MoveTo { abs, x, y } => {
                    builder.move_to(resolve(abs, x, y));
                }
                svgtypes::PathSegment::LineTo { abs, x, y } => {
                    builder.line_to(resolve(abs, x, y));
                }
                svgtypes::PathSegment::HorizontalLineTo { abs, x } => {
                    let x = if abs { x } else { current.x + x };
                    builder.line_to(Point2::new(x, current.y));
                }
                svgtypes::PathSegment::VerticalLineTo { abs, y } => {
                    let y = if abs { y } else { current.y + y };
                    builder.line_to(Point2::new(current.x, y));
                }
                svgtypes::PathSegment::CurveTo {
                    abs,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    let control2 = resolve(abs, x2, y2);
                    builder.cubic_to(resolve(abs, x1, y1), control2, resolve(abs, x, y));
                    next_cubic = Some(control2);
                }
                svgtypes::PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                    let control1 = last_cubic.map_or(current, |c| c.reflect_about(current));
                    let control2 = resolve(abs, x2, y2);
                    builder.cubic_to(control1, control2, resolve(abs, x, y));
                    next_cubic = Some(control2);
                }
                svgtypes::PathSegment::Quadratic { abs, x1, y1, x, y } => {
                    let control = resolve(abs, x1, y1);
                    builder.quad_to(control, resolve(abs, x, y));
                    next_quad = Some(control);
                }
                svgtypes::PathSegment::SmoothQuadratic { abs, x, y } => {
                    let control = last_quad.map_or(current, |c| c.reflect_about(current));
                    builder.quad_to(control, resolve(abs, x, y));
                    next_quad = Some(control);
                }
                svgtypes::PathSegment::EllipticalArc {
                    abs,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    builder.arc_to(rx, ry, x_axis_rotation, large_arc, sweep, resolve(abs, x, y));
                }
                svgtypes::PathSegment::ClosePath { .. } => {
                    builder.close();
                }
            }
            last_cubic = next_cubic;
            last_quad = next_quad;
        }

        let path = builder.finish();
        log::debug!("Paddata geparst: {} subpaden", path.subpaths.len());
        Ok(path)
    }

    #[must_use]
    pub fn from_subpaths(subpaths: Vec<Subpath>) -> Self {
        Self {
            subpaths: subpaths.into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    /// De maximale doorlopende stukken van het pad, in volgorde.
    #[must_use]
    pub fn continuous_subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    #[must_use]
    pub fn into_subpaths(self) -> Vec<Subpath> {
        self.subpaths
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Totaal aantal segmenten over alle subpaden.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(Subpath::len).sum()
    }

    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        if transform.is_identity() {
            return self.clone();
        }
        Self {
            subpaths: self.subpaths.iter().map(|s| s.transformed(transform)).collect(),
        }
    }
}

/// Bouwt een [`SvgPath`] op uit absolute tekencommando's.
///
/// Een subpad eindigt alleen bij `move_to`. Tekenen na `close` zonder nieuwe
/// `move_to` begint bij het startpunt en blijft in hetzelfde subpad.
#[derive(Debug, Default)]
pub struct PathBuilder {
    subpaths: Vec<Subpath>,
    segments: Vec<PathSegment>,
    start: Point2,
    current: Point2,
}

impl PathBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Point2 {
        self.current
    }

    pub fn move_to(&mut self, point: Point2) -> &mut Self {
        self.flush();
        self.start = point;
        self.current = point;
        self
    }

    pub fn line_to(&mut self, point: Point2) -> &mut Self {
        self.push(PathSegment::Line {
            start: self.current,
            end: point,
        })
    }

    pub fn quad_to(&mut self, control: Point2, point: Point2) -> &mut Self {
        self.push(PathSegment::QuadraticCurve {
            start: self.current,
            control,
            end: point,
        })
    }

    pub fn cubic_to(&mut self, control1: Point2, control2: Point2, point: Point2) -> &mut Self {
        self.push(PathSegment::CubicCurve {
            start: self.current,
            control1,
            control2,
            end: point,
        })
    }

    /// Boog in SVG-eindpuntvorm. Een straal van nul geeft een lijn; een boog
    /// naar het huidige punt wordt weggelaten.
    pub fn arc_to(
        &mut self,
        radius_x: f64,
        radius_y: f64,
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        point: Point2,
    ) -> &mut Self {
        if radius_x == 0.0 || radius_y == 0.0 {
            return self.line_to(point);
        }
        match ArcSegment::from_endpoints(
            self.current,
            point,
            radius_x,
            radius_y,
            x_axis_rotation_deg,
            large_arc,
            sweep,
        ) {
            Some(arc) => self.push(PathSegment::EllipticalArc(arc)),
            None => self,
        }
    }

    pub fn close(&mut self) -> &mut Self {
        let start = self.start;
        if self.current != start {
            self.line_to(start);
        }
        self.current = start;
        self
    }

    #[must_use]
    pub fn finish(mut self) -> SvgPath {
        self.flush();
        SvgPath {
            subpaths: self.subpaths,
        }
    }

    fn push(&mut self, segment: PathSegment) -> &mut Self {
        self.current = segment.end_point();
        self.segments.push(segment);
        self
    }

    fn flush(&mut self) {
        if !self.segments.is_empty() {
            self.subpaths
                .push(Subpath::new(std::mem::take(&mut self.segments)));
        }
    }
}

/// Alles wat als pad kan dienen voor de importfuncties.
pub trait IntoSvgPath {
    /// # Errors
    /// Geeft `PathDataError` als de invoer geen geldige paddata is.
    fn into_svg_path(self) -> Result<SvgPath, PathDataError>;
}

impl IntoSvgPath for &str {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        SvgPath::parse(self)
    }
}

impl IntoSvgPath for String {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        SvgPath::parse(&self)
    }
}

impl IntoSvgPath for &String {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        SvgPath::parse(self)
    }
}

impl IntoSvgPath for SvgPath {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        Ok(self)
    }
}

impl IntoSvgPath for &SvgPath {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        Ok(self.clone())
    }
}

impl IntoSvgPath for Subpath {
    fn into_svg_path(self) -> Result<SvgPath, PathDataError> {
        Ok(SvgPath::from_subpaths(vec![self]))
    }
}
