//! Import diagnostics.
//!
//! Conditions that are recoverable but worth knowing about are recorded here
//! instead of failing the import:
//!
//! - loops whose nesting could not be resolved into one outer boundary
//! - exteriors that produced more than one outer wire
//! - curves dropped because they were degenerate
//! - connectors synthesized to bridge gaps
//!
//! Every warning is also sent to `log::warn!` when it is recorded.
//!
//! # Example
//!
//! ```ignore
//! use svg_engine::geom::Tolerance;
//! use svg_engine::import::faces_from_svg_path;
//!
//! let mut faces = faces_from_svg_path("M 0,0 h 2 v 2 h -2 z", Tolerance::STITCH);
//! let shapes: Vec<_> = faces.by_ref().collect();
//! if faces.diagnostics().has_warnings() {
//!     for warning in &faces.diagnostics().warnings {
//!         eprintln!("Warning: {warning}");
//!     }
//! }
//! ```

use std::fmt;

/// A recoverable problem met during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// A nesting group did not have exactly one outer candidate. All
    /// `members` were emitted as independent outer boundaries.
    InvalidNesting { exteriors: usize, members: usize },
    /// One exterior produced `count` outer wires; the extras became holes.
    MultipleOuterWires { count: usize },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNesting { exteriors, members } => write!(
                f,
                "ongeldige nesting ({exteriors} buitenranden), {members} lussen los teruggegeven"
            ),
            Self::MultipleOuterWires { count } => {
                write!(f, "buitenrand leverde {count} wires op, extra wires worden gaten")
            }
        }
    }
}

/// Counters and warnings collected while converting paths.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportDiagnostics {
    /// Subpaths that took part in nesting.
    pub subpath_count: usize,

    /// Curves skipped by the stitcher because the kernel flagged them invalid.
    ///
    /// Zero-length lines and collapsed arcs end up here.
    pub dropped_curve_count: usize,

    /// Straight connectors inserted between curves that did not meet.
    pub connector_count: usize,

    /// Subpaths closed by appending a line from their end to their start.
    pub forced_closure_count: usize,

    pub warnings: Vec<ImportWarning>,
}

impl ImportDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of `InvalidNesting` events.
    #[must_use]
    pub fn invalid_nesting_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ImportWarning::InvalidNesting { .. }))
            .count()
    }

    /// Number of `MultipleOuterWires` events.
    #[must_use]
    pub fn multiple_outer_wire_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ImportWarning::MultipleOuterWires { .. }))
            .count()
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, warning: ImportWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Counts are summed and warnings appended. Nothing is logged again.
    pub fn merge(&mut self, other: &ImportDiagnostics) {
        self.subpath_count += other.subpath_count;
        self.dropped_curve_count += other.dropped_curve_count;
        self.connector_count += other.connector_count;
        self.forced_closure_count += other.forced_closure_count;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Short single-line summary for logs and the CLI.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("subpaths:{}", self.subpath_count)];
        if self.dropped_curve_count > 0 {
            parts.push(format!("dropped:{}", self.dropped_curve_count));
        }
        if self.connector_count > 0 {
            parts.push(format!("connectors:{}", self.connector_count));
        }
        if self.forced_closure_count > 0 {
            parts.push(format!("closed:{}", self.forced_closure_count));
        }
        if self.has_warnings() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }
        parts.join(" ")
    }
}

impl fmt::Display for ImportDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import Diagnostics:")?;
        writeln!(f, "  Subpaths: {}", self.subpath_count)?;
        if self.dropped_curve_count > 0 {
            writeln!(f, "  Dropped curves: {}", self.dropped_curve_count)?;
        }
        if self.connector_count > 0 {
            writeln!(f, "  Connectors: {}", self.connector_count)?;
        }
        if self.forced_closure_count > 0 {
            writeln!(f, "  Forced closures: {}", self.forced_closure_count)?;
        }
        if self.has_warnings() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }
        Ok(())
    }
}
