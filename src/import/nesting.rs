//! Loop Nesting Resolver: deelt gesloten subpaden in als buitenrand of gat.
//!
//! De diepte van een subpad is het aantal andere subpaden waar het volledig
//! binnen ligt. Even diepte is een buitenrand, oneven diepte een gat van de
//! binnenste omsluitende lus.
//!
//! Insluiting wordt getest op de edges van het subpad, bemonsterd tot een
//! koordehoogte relatief aan de grootte van de lus. Raken twee bemonsterde
//! lussen elkaar, dan worden beide fijner bemonsterd, tot ze los van elkaar
//! liggen of de koordehoogte de tolerantie bereikt.

use std::cmp::Reverse;
use std::collections::HashMap;

use super::build::subpath_edges;
use super::diagnostics::{ImportDiagnostics, ImportWarning};
use crate::geom::{BBox, Containment, CurveTessellationOptions, Edge, Polygon2, Tolerance};
use crate::parse::path_data::{Subpath, SvgPath};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Een buitenrand met de gaten die er direct in liggen.
pub type NestedLoops = (Subpath, Vec<Subpath>);

/// Eerste koordehoogte als fractie van de diagonaal van de lus.
const COARSE_DEVIATION: f64 = 1e-3;
/// Factor waarmee de koordehoogte per verfijning kleiner wordt.
const REFINEMENT_FACTOR: f64 = 8.0;
const MAX_REFINEMENTS: usize = 4;
/// Bovengrens op het aantal segmenten per edge.
const MAX_EDGE_SEGMENTS: usize = 4096;

#[derive(Debug, Default)]
struct Group {
    exteriors: Vec<usize>,
    interiors: Vec<usize>,
}

/// Groepeert de subpaden van alle paden in buitenranden met gaten.
///
/// Groepen komen terug in de volgorde waarin hun sleutel voor het eerst
/// gezien werd. Een groep zonder precies één buitenrand levert een
/// [`ImportWarning::InvalidNesting`] op en al haar leden komen los terug.
pub fn unnest_paths<I>(paths: I, tolerance: Tolerance) -> (Vec<NestedLoops>, ImportDiagnostics)
where
    I: IntoIterator<Item = SvgPath>,
{
    let subpaths: Vec<Subpath> = paths
        .into_iter()
        .flat_map(SvgPath::into_subpaths)
        .collect();

    let mut diagnostics = ImportDiagnostics::new();
    diagnostics.subpath_count = subpaths.len();

    let outlines: Vec<Outline> = subpaths
        .iter()
        .map(|subpath| Outline::new(subpath, tolerance))
        .collect();
    let groups = resolve_nesting(
        outlines.len(),
        |inner, outer| outlines[outer].contains(&outlines[inner], tolerance),
        &mut diagnostics,
    );

    let mut slots: Vec<Option<Subpath>> = subpaths.into_iter().map(Some).collect();
    let nested = groups
        .into_iter()
        .filter_map(|(outer, holes)| {
            let outer = slots[outer].take()?;
            let holes = holes
                .into_iter()
                .filter_map(|hole| slots[hole].take())
                .collect();
            Some((outer, holes))
        })
        .collect();

    (nested, diagnostics)
}

/// Omtrek van één subpad als edges plus een grove polygoon.
#[derive(Debug)]
struct Outline {
    edges: Vec<Edge>,
    deviation: f64,
    polygon: Polygon2,
}

impl Outline {
    fn new(subpath: &Subpath, tolerance: Tolerance) -> Self {
        let edges: Vec<Edge> = subpath_edges(subpath).collect();
        let points: Vec<_> = edges.iter().flat_map(Edge::tessellate).collect();
        let diagonal = BBox::from_points(&points).map_or(0.0, BBox::diagonal);
        let deviation = (diagonal * COARSE_DEVIATION).max(tolerance.eps);
        let polygon = sample_edges(&edges, deviation);
        Self {
            edges,
            deviation,
            polygon,
        }
    }

    /// Of `inner` volledig binnen deze lus ligt.
    fn contains(&self, inner: &Self, tolerance: Tolerance) -> bool {
        let mut verdict = self.polygon.classify(&inner.polygon, tolerance);
        let mut deviation = self.deviation.min(inner.deviation);
        for _ in 0..MAX_REFINEMENTS {
            if verdict != Containment::Touching || deviation <= tolerance.eps {
                break;
            }
            deviation = (deviation / REFINEMENT_FACTOR).max(tolerance.eps);
            let outer = sample_edges(&self.edges, deviation);
            verdict = outer.classify(&sample_edges(&inner.edges, deviation), tolerance);
        }
        verdict == Containment::Inside
    }
}

fn sample_edges(edges: &[Edge], deviation: f64) -> Polygon2 {
    let options = CurveTessellationOptions::new(deviation, MAX_EDGE_SEGMENTS);
    let points: Vec<_> = edges
        .iter()
        .flat_map(|edge| edge.tessellate_with(options))
        .collect();
    Polygon2::from_points3(&points)
}

/// Nesting op indexniveau. `is_inside(i, j)` zegt of lus `i` volledig
/// binnen lus `j` ligt.
///
/// Geeft per groep de index van de buitenrand en de indices van de gaten.
pub(crate) fn resolve_nesting<F>(
    count: usize,
    is_inside: F,
    diagnostics: &mut ImportDiagnostics,
) -> Vec<(usize, Vec<usize>)>
where
    F: Fn(usize, usize) -> bool + Sync,
{
    let contained_in = containment_sets(count, &is_inside);

    let mut keys: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Group> = HashMap::new();

    for (index, containers) in contained_in.iter().enumerate() {
        let is_hole = containers.len() % 2 == 1;
        let key = if is_hole {
            // binnenste ouder: de container met de meeste eigen containers
            containers
                .iter()
                .copied()
                .min_by_key(|&j| Reverse(contained_in[j].len()))
                .unwrap_or(index)
        } else {
            index
        };

        let group = groups.entry(key).or_insert_with(|| {
            keys.push(key);
            Group::default()
        });
        if is_hole {
            group.interiors.push(index);
        } else {
            group.exteriors.push(index);
        }
    }

    let mut resolved = Vec::with_capacity(keys.len());
    for key in keys {
        let Some(group) = groups.remove(&key) else {
            continue;
        };

        if let &[outer] = group.exteriors.as_slice() {
            resolved.push((outer, group.interiors));
            continue;
        }

        diagnostics.warn(ImportWarning::InvalidNesting {
            exteriors: group.exteriors.len(),
            members: group.exteriors.len() + group.interiors.len(),
        });
        for member in group.interiors.into_iter().chain(group.exteriors) {
            resolved.push((member, Vec::new()));
        }
    }

    log::debug!("nesting: {count} lussen in {} groepen", resolved.len());
    resolved
}

fn containers_of<F>(index: usize, count: usize, is_inside: &F) -> Vec<usize>
where
    F: Fn(usize, usize) -> bool,
{
    (0..count)
        .filter(|&other| other != index && is_inside(index, other))
        .collect()
}

#[cfg(feature = "parallel")]
fn containment_sets<F>(count: usize, is_inside: &F) -> Vec<Vec<usize>>
where
    F: Fn(usize, usize) -> bool + Sync,
{
    (0..count)
        .into_par_iter()
        .map(|index| containers_of(index, count, is_inside))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn containment_sets<F>(count: usize, is_inside: &F) -> Vec<Vec<usize>>
where
    F: Fn(usize, usize) -> bool + Sync,
{
    (0..count)
        .map(|index| containers_of(index, count, is_inside))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{resolve_nesting, unnest_paths};
    use crate::geom::Tolerance;
    use crate::import::diagnostics::ImportDiagnostics;
    use crate::parse::path_data::SvgPath;

    fn nested_squares(count: usize) -> String {
        (1..=count)
            .map(|s| format!("M-{s},-{s} H{s} V{s} H-{s} Z"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    const SEVEN_RECTS: &str = "M 1,4 L 16,4 L 16,13 L 1,13 L 1,4 Z\
        M 2,5 L 15,5 L 15,12 L 2,12 L 2,5 Z\
        M 11,8 L 14,8 L 14,11 L 11,11 L 11,8 Z\
        M 11,6 L 14,6 L 14,7 L 11,7 L 11,6 Z\
        M 3,6 L 10,6 L 10,11 L 3,11 L 3,6 Z\
        M 7,8 L 9,8 L 9,10 L 7,10 L 7,8 Z\
        M 4,7 L 6,7 L 6,10 L 4,10 L 4,7 Z";

    fn hole_counts(d: &str) -> Vec<usize> {
        let path = SvgPath::parse(d).unwrap();
        let (groups, diagnostics) = unnest_paths([path], Tolerance::STITCH);
        assert!(!diagnostics.has_warnings());
        let mut counts: Vec<usize> = groups.iter().map(|(_, holes)| holes.len()).collect();
        counts.sort_unstable();
        counts
    }

    #[test]
    fn concentric_squares_alternate_outer_and_hole() {
        assert_eq!(hole_counts(&nested_squares(6)), vec![1, 1, 1]);
        assert_eq!(hole_counts(&nested_squares(7)), vec![0, 1, 1, 1]);
    }

    /// Cirkel uit twee halve bogen, met het beginpunt op `start_deg`.
    fn circle(radius: f64, start_deg: f64) -> String {
        let (sin, cos) = start_deg.to_radians().sin_cos();
        let (x, y) = (radius * cos, radius * sin);
        format!(
            "M {x},{y} A {radius},{radius} 0 1 1 {},{} A {radius},{radius} 0 1 1 {x},{y} Z",
            -x, -y
        )
    }

    #[test]
    fn concentric_circles_alternate_outer_and_hole() {
        let circles = |count: usize| {
            (1..=count)
                .map(|k| circle(k as f64, 7.5 * k as f64))
                .collect::<Vec<_>>()
                .join(" ")
        };
        assert_eq!(hole_counts(&circles(4)), vec![1, 1]);
        assert_eq!(hole_counts(&circles(5)), vec![0, 1, 1]);
    }

    #[test]
    fn thin_ring_with_rotated_start_nests() {
        // de koorden van een grove bemonstering snijden door de binnenste cirkel
        let d = format!("{} {}", circle(100.0, 0.0), circle(99.9, 2.8125));
        assert_eq!(hole_counts(&d), vec![1]);
    }

    #[test]
    fn internally_touching_circles_stay_separate() {
        // cirkel met straal 5 rond (5, 0) raakt de buitenste in (10, 0)
        let d = format!("{} M 0,0 A 5,5 0 1 1 10,0 A 5,5 0 1 1 0,0 Z", circle(10.0, 0.0));
        assert_eq!(hole_counts(&d), vec![0, 0]);
    }

    #[test]
    fn seven_rect_fixture() {
        assert_eq!(hole_counts(SEVEN_RECTS), vec![0, 0, 1, 2]);
    }

    #[test]
    fn holes_attach_to_innermost_container() {
        let path = SvgPath::parse(&nested_squares(3)).unwrap();
        let (groups, diagnostics) = unnest_paths([path], Tolerance::STITCH);
        assert_eq!(diagnostics.subpath_count, 3);
        assert_eq!(groups.len(), 2);
        // volgorde van eerste sleutel: vierkant 0 is zelf een buitenrand
        assert!(groups[0].1.is_empty());
        assert_eq!(groups[1].1.len(), 1);
        let outer = groups[1].0.start_point().unwrap();
        let hole = groups[1].1[0].start_point().unwrap();
        assert_eq!((outer.x, hole.x), (-3.0, -2.0));
    }

    #[test]
    fn nesting_is_idempotent() {
        let path = SvgPath::parse(SEVEN_RECTS).unwrap();
        let (first, _) = unnest_paths([path.clone()], Tolerance::STITCH);
        let (second, _) = unnest_paths([path], Tolerance::STITCH);
        assert_eq!(first, second);
    }

    #[test]
    fn cyclic_containment_degrades_with_warnings() {
        // 0 in 1, 1 in 2, 2 in 0: elk lid is een gat zonder buitenrand
        let inside = |i: usize, j: usize| j == (i + 1) % 3;
        let mut diagnostics = ImportDiagnostics::new();
        let groups = resolve_nesting(3, inside, &mut diagnostics);
        assert_eq!(groups, vec![(0, vec![]), (1, vec![]), (2, vec![])]);
        assert_eq!(diagnostics.invalid_nesting_count(), 3);
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        // 0, 1 en 2 overlappen zonder elkaar te bevatten; 3 ligt in alle drie
        let inside = |i: usize, j: usize| i == 3 && j != 3;
        let mut diagnostics = ImportDiagnostics::new();
        let groups = resolve_nesting(4, inside, &mut diagnostics);
        assert_eq!(groups, vec![(0, vec![3]), (1, vec![]), (2, vec![])]);
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn mutually_containing_loops_stay_separate_outers() {
        // 1 en 2 liggen in 0 en in elkaar: beide diepte 2
        let inside = |i: usize, j: usize| matches!((i, j), (1 | 2, 0) | (1, 2) | (2, 1));
        let mut diagnostics = ImportDiagnostics::new();
        let groups = resolve_nesting(3, inside, &mut diagnostics);
        assert_eq!(groups, vec![(0, vec![]), (1, vec![]), (2, vec![])]);
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn empty_input_gives_no_groups() {
        let (groups, diagnostics) = unnest_paths(Vec::<SvgPath>::new(), Tolerance::STITCH);
        assert!(groups.is_empty());
        assert_eq!(diagnostics.subpath_count, 0);
    }
}
