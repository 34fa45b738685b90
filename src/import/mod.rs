//! SVG-import: van paddata en documenten naar wires en faces.
//!
//! De pijplijn per pad is Curve Builder ([`build`]), Continuity Stitcher
//! ([`stitch`]), Loop Nesting Resolver ([`nesting`]) en Region Assembler
//! ([`assemble`]). De documentwalker in [`crate::parse::svg_xml`] voert elk
//! vormelement door dezelfde pijplijn.

pub mod assemble;
pub mod build;
pub mod diagnostics;
pub mod nesting;
pub mod stitch;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::geom::{GeometryError, Tolerance};
use crate::parse::path_data::{IntoSvgPath, PathDataError};
use crate::parse::style::StyleError;
use crate::parse::svg_xml::SvgShapes;

pub use assemble::{FacesFromPath, WiresFromPath, face_from_wires, wire_from_subpath};
pub use build::{EdgesFromPath, build_curve, subpath_edges};
pub use diagnostics::{ImportDiagnostics, ImportWarning};
pub use nesting::{NestedLoops, unnest_paths};
pub use stitch::{GapFiller, fill_gaps_between_edges, known_continuous_edges_to_wire};

/// Attribuut waarin Inkscape de laagnaam of objectnaam bewaart.
pub const INKSCAPE_LABEL: &str = "inkscape:label";

/// Fouten tijdens het importeren van SVG.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Ongeldige XML-opmaak of ongeldige paddata.
    #[error("syntaxfout: {0}")]
    Syntax(String),
    /// De bron kon niet gelezen worden.
    #[error("leesfout: {0}")]
    Io(#[from] io::Error),
    /// Geometrie kon niet opgebouwd worden.
    #[error("geometriefout: {0}")]
    Geometry(#[from] GeometryError),
}

/// Soort importfout, zonder de details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    Syntax,
    Io,
    Geometry,
}

impl ImportError {
    #[must_use]
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            Self::Syntax(_) => ImportErrorKind::Syntax,
            Self::Io(_) => ImportErrorKind::Io,
            Self::Geometry(_) => ImportErrorKind::Geometry,
        }
    }
}

impl From<quick_xml::Error> for ImportError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(shared) => Self::Io(
                Arc::try_unwrap(shared)
                    .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string())),
            ),
            other => Self::Syntax(other.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ImportError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Syntax(err.to_string())
    }
}

impl From<PathDataError> for ImportError {
    fn from(err: PathDataError) -> Self {
        Self::Syntax(err.to_string())
    }
}

impl From<StyleError> for ImportError {
    fn from(err: StyleError) -> Self {
        Self::Syntax(err.to_string())
    }
}

/// Instellingen voor het importeren van documenten.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Attribuut dat als label wordt overgenomen; `None` schakelt labels uit.
    pub label_by: Option<String>,
    /// Spiegel in het XZ-vlak (y → −y), van SVG Y-omlaag naar Y-omhoog.
    pub mirror: bool,
    /// Tolerantie voor gap filling en het sluiten van lussen.
    pub tolerance: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            label_by: Some("id".to_owned()),
            mirror: true,
            tolerance: Tolerance::STITCH.eps,
        }
    }
}

impl ImportOptions {
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance)
    }

    /// Of de tolerantie een positief eindig getal is.
    #[must_use]
    pub fn has_valid_tolerance(&self) -> bool {
        self.tolerance.is_finite() && self.tolerance > 0.0
    }

    #[must_use]
    pub fn with_label_by(mut self, attribute: Option<&str>) -> Self {
        self.label_by = attribute.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Bron voor [`import_svg_document`].
pub enum SvgSource<'a> {
    File(&'a Path),
    Reader(Box<dyn BufRead + 'a>),
    Text(&'a str),
}

/// Lazy reeks edges van alle subpaden, zonder gap filling.
pub fn edges_from_svg_path(path: impl IntoSvgPath) -> EdgesFromPath {
    EdgesFromPath::new(path.into_svg_path().map_err(ImportError::from))
}

/// Lazy reeks wires, één per subpad.
pub fn wires_from_svg_path(path: impl IntoSvgPath, tolerance: Tolerance) -> WiresFromPath {
    WiresFromPath::new(path.into_svg_path().map_err(ImportError::from), tolerance)
}

/// Lazy reeks faces, met gaten volgens de nesting van de subpaden.
pub fn faces_from_svg_path(path: impl IntoSvgPath, tolerance: Tolerance) -> FacesFromPath {
    FacesFromPath::new(path.into_svg_path().map_err(ImportError::from), tolerance)
}

/// Importeert een SVG-document uit tekst.
pub fn import_svg_str(text: &str, options: ImportOptions) -> SvgShapes<&[u8]> {
    SvgShapes::new(text.as_bytes(), options)
}

/// Importeert een SVG-document uit een willekeurige `BufRead`.
pub fn import_svg_reader<R: BufRead>(reader: R, options: ImportOptions) -> SvgShapes<R> {
    SvgShapes::new(reader, options)
}

/// Importeert een SVG-bestand.
///
/// # Errors
/// Geeft `ImportError::Io` als het bestand niet geopend kan worden.
pub fn import_svg_file(
    path: impl AsRef<Path>,
    options: ImportOptions,
) -> Result<SvgShapes<BufReader<File>>, ImportError> {
    let file = File::open(path.as_ref())?;
    log::debug!("svg openen: {}", path.as_ref().display());
    Ok(SvgShapes::new(BufReader::new(file), options))
}

/// Importeert een document uit elk type bron.
///
/// # Errors
/// Geeft `ImportError::Io` als een bestand niet geopend kan worden. Fouten
/// in het document zelf komen uit de teruggegeven reeks.
pub fn import_svg_document<'a>(
    source: SvgSource<'a>,
    options: ImportOptions,
) -> Result<SvgShapes<Box<dyn BufRead + 'a>>, ImportError> {
    let reader: Box<dyn BufRead + 'a> = match source {
        SvgSource::File(path) => Box::new(BufReader::new(File::open(path)?)),
        SvgSource::Reader(reader) => reader,
        SvgSource::Text(text) => Box::new(text.as_bytes()),
    };
    Ok(SvgShapes::new(reader, options))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::de::value::{Error as ValueError, MapDeserializer};

    use super::{
        ImportError, ImportErrorKind, ImportOptions, edges_from_svg_path, faces_from_svg_path,
        wires_from_svg_path,
    };
    use crate::geom::{GeometryError, Tolerance};

    #[test]
    fn options_default_to_id_labels_and_mirroring() {
        let options = ImportOptions::default();
        assert_eq!(options.label_by.as_deref(), Some("id"));
        assert!(options.mirror);
        assert_eq!(options.tolerance(), Tolerance::STITCH);
    }

    #[test]
    fn options_fill_missing_fields_with_defaults() {
        let map = MapDeserializer::<_, ValueError>::new(vec![("mirror", false)].into_iter());
        let options = ImportOptions::deserialize(map).unwrap();
        assert!(!options.mirror);
        assert_eq!(options.label_by.as_deref(), Some("id"));
    }

    #[test]
    fn tolerance_must_be_positive_and_finite() {
        assert!(ImportOptions::default().has_valid_tolerance());
        for bad in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
            assert!(!ImportOptions::default().with_tolerance(bad).has_valid_tolerance());
        }
    }

    #[test]
    fn error_kinds() {
        assert_eq!(ImportError::Syntax("x".into()).kind(), ImportErrorKind::Syntax);
        assert_eq!(
            ImportError::from(std::io::Error::other("weg")).kind(),
            ImportErrorKind::Io
        );
        assert_eq!(
            ImportError::from(GeometryError::EmptyWire).kind(),
            ImportErrorKind::Geometry
        );
    }

    #[test]
    fn entry_points_accept_strings_and_parsed_paths() {
        let d = String::from("M 0,0 h 1 v 1 z");
        assert_eq!(edges_from_svg_path(&d).count(), 3);
        assert_eq!(wires_from_svg_path(d.as_str(), Tolerance::STITCH).count(), 1);
        assert_eq!(faces_from_svg_path(d, Tolerance::STITCH).count(), 1);
    }

    #[test]
    fn broken_path_data_fails_with_syntax() {
        for kind in [
            edges_from_svg_path("M 0,0 FFF 1 h 1").next().map(|r| r.map(|_| ())),
            wires_from_svg_path("M 0,0 FFF 1 h 1", Tolerance::STITCH)
                .next()
                .map(|r| r.map(|_| ())),
            faces_from_svg_path("M 0,0 FFF 1 h 1", Tolerance::STITCH)
                .next()
                .map(|r| r.map(|_| ())),
        ] {
            assert_eq!(kind.map(|r| r.map_err(|e| e.kind())), Some(Err(ImportErrorKind::Syntax)));
        }
    }
}
