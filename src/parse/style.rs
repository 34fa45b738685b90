//! Overerfbare presentatie-attributen van SVG-elementen.
//!
//! Alleen de eigenschappen die de import nodig heeft worden bijgehouden:
//! fill, stroke, hun opacity, `color`, `visibility`, `display` en de
//! samengestelde `transform`.

use std::str::FromStr;

use svgtypes::Paint as SvgPaint;
use thiserror::Error;

use crate::geom::{Color, Transform};

/// Effectieve verf voor fill of stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    None,
    Color(Color),
    /// Paint server (`url(...)`), context-verf of een onleesbare waarde:
    /// wel gevuld, maar zonder kleur.
    Uncolored,
}

impl Paint {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::None | Self::Uncolored => None,
        }
    }
}

/// Zichtbaarheid volgens de `visibility` eigenschap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "collapse" => Some(Self::Collapse),
            _ => None,
        }
    }
}

/// De berekende stijl van een element, na overerving.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub current_color: Color,
    pub visibility: Visibility,
    /// `display="none"`; wordt niet overgeërfd maar verbergt de hele subtree.
    pub display_none: bool,
    /// Samengestelde transformatie van de root tot en met dit element.
    pub transform: Transform,
}

impl Default for Style {
    fn default() -> Self {
        let black = Color::new(0.0, 0.0, 0.0, 1.0);
        Self {
            fill: Paint::Color(black),
            stroke: Paint::None,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            current_color: black,
            visibility: Visibility::Visible,
            display_none: false,
            transform: Transform::identity(),
        }
    }
}

/// Fout in een attribuut dat niet genegeerd kan worden.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StyleError(pub String);

impl Style {
    /// Berekent de stijl van een kind-element uit die van de ouder en de
    /// eigen attributen. Declaraties in `style` winnen van losse attributen.
    ///
    /// # Errors
    /// Geeft `StyleError` als het `transform` attribuut niet te parsen is.
    pub fn cascade(&self, attributes: &[(String, String)]) -> Result<Self, StyleError> {
        let mut declarations: Vec<(&str, &str)> = attributes
            .iter()
            .filter(|(name, _)| name != "style" && name != "transform")
            .map(|(name, value)| (name.as_str(), value.trim()))
            .collect();
        if let Some((_, inline)) = attributes.iter().find(|(name, _)| name == "style") {
            declarations.extend(parse_style_attribute(inline));
        }

        let mut style = Self {
            display_none: false,
            ..self.clone()
        };

        // `color` eerst, zodat currentColor in dezelfde declaraties klopt
        for (name, value) in &declarations {
            if *name == "color" {
                if let Ok(color) = svgtypes::Color::from_str(value) {
                    style.current_color = to_color(color);
                }
            }
        }

        for (name, value) in declarations {
            match name {
                "fill" => style.fill = resolve_paint(value, self.fill, style.current_color),
                "stroke" => style.stroke = resolve_paint(value, self.stroke, style.current_color),
                "fill-opacity" => {
                    style.fill_opacity = parse_opacity(value).unwrap_or(self.fill_opacity);
                }
                "stroke-opacity" => {
                    style.stroke_opacity = parse_opacity(value).unwrap_or(self.stroke_opacity);
                }
                "visibility" => {
                    if let Some(visibility) = Visibility::parse(value) {
                        style.visibility = visibility;
                    }
                }
                "display" => style.display_none = value == "none",
                _ => {}
            }
        }

        if let Some((_, text)) = attributes.iter().find(|(name, _)| name == "transform") {
            let local = svgtypes::Transform::from_str(text)
                .map_err(|err| StyleError(format!("ongeldige transform `{text}`: {err}")))?;
            style.transform = self.transform
                * Transform::from_svg_matrix(local.a, local.b, local.c, local.d, local.e, local.f);
        }

        Ok(style)
    }

    /// Of het element getekend wordt.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible && !self.display_none
    }

    /// Gevulde elementen worden faces, de rest wires.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        !self.fill.is_none()
    }

    /// Kleur uit de fill bij gevulde elementen, anders uit de stroke.
    #[must_use]
    pub fn shape_color(&self) -> Option<Color> {
        let (paint, opacity) = if self.is_filled() {
            (self.fill, self.fill_opacity)
        } else {
            (self.stroke, self.stroke_opacity)
        };
        paint.color().map(|c| Color::new(c.r, c.g, c.b, c.a * opacity))
    }
}

/// Splitst `fill: red; stroke:none` in naam/waarde-paren.
fn parse_style_attribute(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.split(';').filter_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        let name = name.trim();
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map_or(value, str::trim_end);
        (!name.is_empty()).then_some((name, value))
    })
}

fn resolve_paint(value: &str, inherited: Paint, current_color: Color) -> Paint {
    match SvgPaint::from_str(value) {
        Ok(SvgPaint::None) => Paint::None,
        Ok(SvgPaint::Inherit) => inherited,
        Ok(SvgPaint::CurrentColor) => Paint::Color(current_color),
        Ok(SvgPaint::Color(color)) => Paint::Color(to_color(color)),
        Ok(SvgPaint::FuncIRI(..) | SvgPaint::ContextFill | SvgPaint::ContextStroke) => {
            Paint::Uncolored
        }
        Err(err) => {
            log::debug!("onleesbare verf `{value}`: {err}");
            Paint::Uncolored
        }
    }
}

fn parse_opacity(value: &str) -> Option<f64> {
    let number = svgtypes::Number::from_str(value).ok()?;
    Some(number.0.clamp(0.0, 1.0))
}

fn to_color(color: svgtypes::Color) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, color.alpha)
}
