//! Documentwalker voor SVG.
//!
//! Leest het document event voor event en zet elk zichtbaar vormelement om
//! naar faces (gevuld) of wires (niet gevuld), in documentvolgorde.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::shapes::{SHAPE_ELEMENTS, shape_to_path};
use super::style::Style;
use crate::geom::Shape;
use crate::import::{
    ImportDiagnostics, ImportError, ImportOptions, faces_from_svg_path, wires_from_svg_path,
};

/// Elementen waarvan de inhoud nooit getekend wordt.
const SKIPPED_ELEMENTS: [&str; 15] = [
    "defs",
    "clipPath",
    "mask",
    "symbol",
    "marker",
    "pattern",
    "linearGradient",
    "radialGradient",
    "style",
    "title",
    "desc",
    "metadata",
    "text",
    "script",
    "foreignObject",
];

/// Elementen waarvan de kinderen bezocht worden. Van `switch` alleen het
/// eerste kind waarvan de voorwaarden kloppen.
const CONTAINER_ELEMENTS: [&str; 4] = ["svg", "g", "a", "switch"];

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    fn read(start: &BytesStart<'_>) -> Result<Self, ImportError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self { name, attributes })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Of dit element als kind van `switch` gekozen kan worden. Extensies
    /// worden niet ondersteund; andere voorwaarden gelden als vervuld.
    fn passes_switch_conditions(&self) -> bool {
        !SKIPPED_ELEMENTS.contains(&self.name.as_str())
            && self
                .attribute("requiredExtensions")
                .is_none_or(|value| value.trim().is_empty())
    }
}

/// Open element op de stapel. Een `style` van `None` betekent dat de
/// (rest van de) subtree overgeslagen wordt.
#[derive(Debug)]
struct Frame {
    style: Option<Style>,
    is_switch: bool,
}

impl Frame {
    fn skipped() -> Self {
        Self {
            style: None,
            is_switch: false,
        }
    }
}

/// Lazy, eenmalige reeks vormen uit een SVG-document.
///
/// De eerste fout wordt één keer teruggegeven; daarna eindigt de reeks.
pub struct SvgShapes<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    options: ImportOptions,
    stack: Vec<Frame>,
    seen_root: bool,
    pending: VecDeque<Shape>,
    diagnostics: ImportDiagnostics,
    finished: bool,
}

impl<R: BufRead> SvgShapes<R> {
    pub(crate) fn new(reader: R, options: ImportOptions) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            options,
            stack: Vec::new(),
            seen_root: false,
            pending: VecDeque::new(),
            diagnostics: ImportDiagnostics::new(),
            finished: false,
        }
    }

    /// Opgetelde diagnostiek van alle elementen die tot nu toe verwerkt zijn.
    #[must_use]
    pub fn diagnostics(&self) -> &ImportDiagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Verwerkt één XML-event. Geeft `false` aan het einde van het document.
    fn advance(&mut self) -> Result<bool, ImportError> {
        self.buf.clear();
        let (element, has_children) = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(start) => (Element::read(&start)?, true),
            Event::Empty(start) => (Element::read(&start)?, false),
            Event::End(_) => {
                if self.stack.pop().is_none() {
                    return Err(ImportError::Syntax("sluittag zonder open element".into()));
                }
                return Ok(true);
            }
            Event::Eof => {
                if !self.stack.is_empty() {
                    return Err(ImportError::Syntax(format!(
                        "document eindigt met {} open element(en)",
                        self.stack.len()
                    )));
                }
                if !self.seen_root {
                    return Err(ImportError::Syntax("document bevat geen root-element".into()));
                }
                return Ok(false);
            }
            _ => return Ok(true),
        };

        let frame = self.open_element(&element)?;
        if has_children {
            self.stack.push(frame);
        }
        Ok(true)
    }

    fn open_element(&mut self, element: &Element) -> Result<Frame, ImportError> {
        let parent = match self.stack.last_mut() {
            Some(frame) if frame.is_switch => {
                if !element.passes_switch_conditions() {
                    return Ok(Frame::skipped());
                }
                // alleen het eerste geschikte kind; de rest valt weg
                frame.style.take()
            }
            Some(frame) => frame.style.clone(),
            None => {
                if self.seen_root {
                    return Err(ImportError::Syntax("meer dan één root-element".into()));
                }
                self.seen_root = true;
                if element.name != "svg" {
                    return Err(ImportError::Syntax(format!(
                        "root-element is `{}` in plaats van `svg`",
                        element.name
                    )));
                }
                Some(Style::default())
            }
        };

        let Some(parent) = parent else {
            return Ok(Frame::skipped());
        };
        let name = element.name.as_str();
        if SKIPPED_ELEMENTS.contains(&name) {
            log::debug!("`{name}` overgeslagen");
            return Ok(Frame::skipped());
        }

        let style = parent.cascade(&element.attributes)?;
        if style.display_none {
            return Ok(Frame::skipped());
        }

        if SHAPE_ELEMENTS.contains(&name) {
            self.emit_shape(element, &style)?;
        }

        if CONTAINER_ELEMENTS.contains(&name) {
            Ok(Frame {
                style: Some(style),
                is_switch: name == "switch",
            })
        } else {
            Ok(Frame::skipped())
        }
    }

    fn emit_shape(&mut self, element: &Element, style: &Style) -> Result<(), ImportError> {
        if !style.is_visible() {
            return Ok(());
        }
        let Some(path) = shape_to_path(&element.name, &element.attributes)? else {
            return Ok(());
        };
        let path = if style.transform.is_identity() {
            path
        } else {
            path.transformed(&style.transform)
        };

        let tolerance = self.options.tolerance();
        let mirror = self.options.mirror;
        let label = self
            .options
            .label_by
            .as_deref()
            .and_then(|key| element.attribute(key))
            .map(str::to_owned);
        let color = style.shape_color();
        let finish = |shape: Shape| {
            let mut shape = if mirror { shape.mirror() } else { shape };
            shape.set_label(label.clone());
            shape.set_color(color);
            shape
        };

        if style.is_filled() {
            let mut faces = faces_from_svg_path(path, tolerance);
            for face in faces.by_ref() {
                self.pending.push_back(finish(Shape::Face(face?)));
            }
            self.diagnostics.merge(faces.diagnostics());
        } else {
            let mut wires = wires_from_svg_path(path, tolerance);
            for wire in wires.by_ref() {
                self.pending.push_back(finish(Shape::Wire(wire?)));
            }
            self.diagnostics.merge(wires.diagnostics());
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for SvgShapes<R> {
    type Item = Result<Shape, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(shape) = self.pending.pop_front() {
                return Some(Ok(shape));
            }
            if self.finished {
                return None;
            }
            match self.advance() {
                Ok(true) => {}
                Ok(false) => self.finished = true,
                Err(err) => {
                    self.finished = true;
                    self.pending.clear();
                    return Some(Err(err));
                }
            }
        }
    }
}
