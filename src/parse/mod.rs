//! Parsers voor SVG-documenten, paddata en presentatie-attributen.

pub mod path_data;
pub mod shapes;
pub mod style;
pub mod svg_xml;
