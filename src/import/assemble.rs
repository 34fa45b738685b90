//! Region Assembler: bouwt wires en faces uit (geneste) subpaden.

use std::vec;

use super::build::subpath_edges;
use super::diagnostics::{ImportDiagnostics, ImportWarning};
use super::nesting::{NestedLoops, unnest_paths};
use super::stitch::fill_gaps_between_edges;
use super::ImportError;
use crate::geom::{Edge, Face, GeometryError, Tolerance, Wire};
use crate::parse::path_data::{Subpath, SvgPath};

/// Stitcht één subpad tot een wire.
///
/// Geeft `Ok(None)` als er na het filteren geen bruikbare edges over zijn.
///
/// # Errors
/// Geeft `GeometryError` als de gestitchte edges geen wire vormen.
pub fn wire_from_subpath(
    subpath: &Subpath,
    tolerance: Tolerance,
    diagnostics: &mut ImportDiagnostics,
) -> Result<Option<Wire>, GeometryError> {
    let mut filler = fill_gaps_between_edges(subpath_edges(subpath), tolerance);
    let edges: Vec<Edge> = filler.by_ref().collect();
    diagnostics.dropped_curve_count += filler.dropped_count();
    diagnostics.connector_count += filler.connector_count();

    if edges.is_empty() {
        return Ok(None);
    }
    Wire::make_wire(edges, tolerance).map(Some)
}

/// Combineert de wires van één buitenrand tot een face.
///
/// De eerste wire wordt de buitenrand; extra buitenwires worden vooraan bij
/// de gaten gevoegd en leveren een [`ImportWarning::MultipleOuterWires`] op.
///
/// # Errors
/// Geeft `GeometryError::OpenBoundary` als een van de wires open is.
pub fn face_from_wires(
    outer_wires: Vec<Wire>,
    holes: Vec<Wire>,
    diagnostics: &mut ImportDiagnostics,
) -> Result<Option<Face>, GeometryError> {
    let count = outer_wires.len();
    let mut outer_wires = outer_wires.into_iter();
    let Some(outer) = outer_wires.next() else {
        return Ok(None);
    };

    if count > 1 {
        diagnostics.warn(ImportWarning::MultipleOuterWires { count });
    }
    let inners = outer_wires.chain(holes).collect();
    Face::make_from_wires(outer, inners).map(Some)
}

/// Lazy reeks wires: elk subpad los, zonder nesting of sluiten.
#[derive(Debug)]
pub struct WiresFromPath {
    error: Option<ImportError>,
    subpaths: vec::IntoIter<Subpath>,
    tolerance: Tolerance,
    diagnostics: ImportDiagnostics,
    finished: bool,
}

impl WiresFromPath {
    pub(crate) fn new(path: Result<SvgPath, ImportError>, tolerance: Tolerance) -> Self {
        let mut diagnostics = ImportDiagnostics::new();
        let (error, subpaths) = match path {
            Ok(path) => (None, path.into_subpaths()),
            Err(err) => (Some(err), Vec::new()),
        };
        diagnostics.subpath_count = subpaths.len();
        Self {
            error,
            subpaths: subpaths.into_iter(),
            tolerance,
            diagnostics,
            finished: false,
        }
    }

    /// Tellers en waarschuwingen van de wires die tot nu toe gemaakt zijn.
    #[must_use]
    pub fn diagnostics(&self) -> &ImportDiagnostics {
        &self.diagnostics
    }
}

impl Iterator for WiresFromPath {
    type Item = Result<Wire, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(err) = self.error.take() {
            self.finished = true;
            return Some(Err(err));
        }

        loop {
            let Some(subpath) = self.subpaths.next() else {
                self.finished = true;
                return None;
            };
            match wire_from_subpath(&subpath, self.tolerance, &mut self.diagnostics) {
                Ok(Some(wire)) => return Some(Ok(wire)),
                Ok(None) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

/// Lazy reeks faces.
///
/// Bij de eerste aanroep van `next` worden alle subpaden gesloten en
/// genest; daarna wordt per groep één face gebouwd.
#[derive(Debug)]
pub struct FacesFromPath {
    source: Option<Result<SvgPath, ImportError>>,
    groups: vec::IntoIter<NestedLoops>,
    tolerance: Tolerance,
    diagnostics: ImportDiagnostics,
    finished: bool,
}

impl FacesFromPath {
    pub(crate) fn new(path: Result<SvgPath, ImportError>, tolerance: Tolerance) -> Self {
        Self {
            source: Some(path),
            groups: Vec::new().into_iter(),
            tolerance,
            diagnostics: ImportDiagnostics::new(),
            finished: false,
        }
    }

    /// Tellers en waarschuwingen, inclusief die van de nesting.
    #[must_use]
    pub fn diagnostics(&self) -> &ImportDiagnostics {
        &self.diagnostics
    }

    fn prepare(&mut self, path: SvgPath) -> Result<(), GeometryError> {
        let mut subpaths = path.into_subpaths();
        for subpath in &mut subpaths {
            let was_closed = subpath.is_closed(self.tolerance);
            if !subpath.close(self.tolerance) {
                return Err(GeometryError::NotClosed {
                    gap: subpath.closure_gap(),
                });
            }
            if !was_closed {
                self.diagnostics.forced_closure_count += 1;
            }
        }

        let (groups, nesting) = unnest_paths([SvgPath::from_subpaths(subpaths)], self.tolerance);
        self.diagnostics.merge(&nesting);
        self.groups = groups.into_iter();
        Ok(())
    }

    fn face_from_group(&mut self, outer: &Subpath, holes: &[Subpath]) -> Result<Option<Face>, GeometryError> {
        let Some(outer) = wire_from_subpath(outer, self.tolerance, &mut self.diagnostics)? else {
            return Ok(None);
        };
        let mut inners = Vec::with_capacity(holes.len());
        for hole in holes {
            if let Some(wire) = wire_from_subpath(hole, self.tolerance, &mut self.diagnostics)? {
                inners.push(wire);
            }
        }
        face_from_wires(vec![outer], inners, &mut self.diagnostics)
    }
}

impl Iterator for FacesFromPath {
    type Item = Result<Face, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if let Some(source) = self.source.take() {
            let prepared = source.and_then(|path| self.prepare(path).map_err(ImportError::from));
            if let Err(err) = prepared {
                self.finished = true;
                return Some(Err(err));
            }
        }

        loop {
            let Some((outer, holes)) = self.groups.next() else {
                self.finished = true;
                return None;
            };
            match self.face_from_group(&outer, &holes) {
                Ok(Some(face)) => return Some(Ok(face)),
                Ok(None) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}
