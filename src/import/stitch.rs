//! Continuity Stitcher: dicht kleine gaten tussen opeenvolgende edges.
//!
//! Bogen die uit eindpuntvorm zijn omgerekend eindigen zelden bit-exact op
//! het beginpunt van het volgende segment. Waar het verschil groter is dan de
//! tolerantie wordt een rechte connector ingevoegd.

use crate::geom::{Edge, GeometryError, Point3, Tolerance, Wire};

/// Lazy, eenmalige reeks edges met connectors tussen gaten.
///
/// Ongeldige edges (nul lengte, ingeklapt, niet-eindig) worden overgeslagen.
#[derive(Debug)]
pub struct GapFiller<I> {
    edges: I,
    tolerance: Tolerance,
    last_end: Option<Point3>,
    queued: Option<Edge>,
    dropped: usize,
    connectors: usize,
}

impl<I: Iterator<Item = Edge>> GapFiller<I> {
    /// Aantal overgeslagen ongeldige edges tot nu toe.
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Aantal ingevoegde connectors tot nu toe.
    #[must_use]
    pub fn connector_count(&self) -> usize {
        self.connectors
    }
}

impl<I: Iterator<Item = Edge>> Iterator for GapFiller<I> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if let Some(edge) = self.queued.take() {
            self.last_end = Some(edge.end_point());
            return Some(edge);
        }

        loop {
            let edge = self.edges.next()?;
            if !edge.is_valid() {
                self.dropped += 1;
                continue;
            }

            if let Some(end) = self.last_end {
                let start = edge.start_point();
                if end.distance_to(start) > self.tolerance.eps {
                    self.connectors += 1;
                    self.queued = Some(edge);
                    return Some(Edge::connector(end, start));
                }
            }

            self.last_end = Some(edge.end_point());
            return Some(edge);
        }
    }
}

/// Voegt rechte connectors in waar opeenvolgende edges verder dan
/// `tolerance` uit elkaar liggen.
pub fn fill_gaps_between_edges<I>(edges: I, tolerance: Tolerance) -> GapFiller<I::IntoIter>
where
    I: IntoIterator<Item = Edge>,
{
    GapFiller {
        edges: edges.into_iter(),
        tolerance,
        last_end: None,
        queued: None,
        dropped: 0,
        connectors: 0,
    }
}

/// Maakt één wire van edges die al op volgorde liggen, zonder herordenen of
/// splitsen. Kleine gaten worden eerst gedicht.
///
/// # Errors
/// Geeft `GeometryError` als er geen bruikbare edges over zijn of als de
/// edges daarna nog niet aansluiten.
pub fn known_continuous_edges_to_wire<I>(edges: I, tolerance: Tolerance) -> Result<Wire, GeometryError>
where
    I: IntoIterator<Item = Edge>,
{
    Wire::make_wire(fill_gaps_between_edges(edges, tolerance), tolerance)
}
