use std::f64::consts::PI;
use std::fs;
use std::io::Cursor;

use svg_engine::Engine;
use svg_engine::geom::{Color, Face, Shape, Tolerance};
use svg_engine::import::{
    ImportErrorKind, ImportOptions, SvgSource, edges_from_svg_path, faces_from_svg_path,
    import_svg_document, import_svg_file, import_svg_reader, import_svg_str, wires_from_svg_path,
};

const TOL: Tolerance = Tolerance::STITCH;

fn document(svg: &str) -> Vec<Shape> {
    import_svg_str(svg, ImportOptions::default())
        .collect::<Result<_, _>>()
        .expect("import svg")
}

fn faces(d: &str) -> Vec<Face> {
    faces_from_svg_path(d, TOL)
        .collect::<Result<_, _>>()
        .expect("faces")
}

fn nested_squares_path(count: usize) -> String {
    (1..=count)
        .map(|s| format!("M-{s},-{s} H{s} V{s} H-{s} Z"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn circle_path(radius: f64, start_deg: f64) -> String {
    let (sin, cos) = start_deg.to_radians().sin_cos();
    let (x, y) = (radius * cos, radius * sin);
    format!(
        "M {x},{y} A {radius},{radius} 0 1 1 {},{} A {radius},{radius} 0 1 1 {x},{y} Z",
        -x, -y
    )
}

fn hole_counts(faces: &[Face]) -> Vec<usize> {
    let mut counts: Vec<usize> = faces.iter().map(|f| f.inner_wires().len()).collect();
    counts.sort_unstable();
    counts
}

#[test]
fn engine_initializes() {
    let engine = Engine::new();
    assert!(engine.is_initialized());
    assert_eq!(engine.shape_count(), 0);
}

#[test]
fn doc_from_buffer() {
    let svg = Cursor::new(r#"<svg><path d="M 0,1 L 2,3"/></svg>"#);
    let shapes: Vec<_> = import_svg_reader(svg, ImportOptions::default())
        .collect::<Result<_, _>>()
        .expect("import");
    assert_eq!(shapes.len(), 1);
}

#[test]
fn doc_from_file() {
    let path = std::env::temp_dir().join(format!("svg_engine_doc_{}.svg", std::process::id()));
    fs::write(&path, r#"<svg><path d="M 0,1 L 2,3"/></svg>"#).expect("write temp svg");

    let from_file = import_svg_file(&path, ImportOptions::default())
        .expect("open")
        .count();
    let from_source = import_svg_document(SvgSource::File(&path), ImportOptions::default())
        .expect("open")
        .count();
    let _ = fs::remove_file(&path);

    assert_eq!(from_file, 1);
    assert_eq!(from_source, 1);
}

#[test]
fn doc_sources_agree() {
    let svg = r#"<svg><rect width="1" height="1"/><path fill="none" d="M 0,0 h 3"/></svg>"#;
    let text = import_svg_document(SvgSource::Text(svg), ImportOptions::default())
        .expect("text")
        .count();
    let reader = import_svg_document(
        SvgSource::Reader(Box::new(svg.as_bytes())),
        ImportOptions::default(),
    )
    .expect("reader")
    .count();
    assert_eq!((text, reader), (2, 2));
}

#[test]
fn doc_with_id_attr() {
    let imported = document(
        r#"<svg>
            <path id="path1" fill="none" d="M 0,10 v 3"/>
            <path id="path2" d="M 0,0 v 2 h 2 z"/>
        </svg>"#,
    );
    assert_eq!(imported.len(), 2);
    assert!(matches!(imported[0], Shape::Wire(_)));
    assert_eq!(imported[0].label(), Some("path1"));
    assert!(matches!(imported[1], Shape::Face(_)));
    assert_eq!(imported[1].label(), Some("path2"));
}

#[test]
fn doc_with_class_attr() {
    let svg = r#"<svg>
            <path class="path1" fill="none" d="M 0,10 v 3"/>
            <path class="path2" d="M 0,0 v 2 h 2 z"/>
        </svg>"#;
    let imported: Vec<_> = import_svg_str(svg, ImportOptions::default().with_label_by(Some("class")))
        .collect::<Result<_, _>>()
        .expect("import");
    assert_eq!(imported.len(), 2);
    assert!(!imported[0].is_face());
    assert_eq!(imported[0].label(), Some("path1"));
    assert!(imported[1].is_face());
    assert_eq!(imported[1].label(), Some("path2"));
}

#[test]
fn doc_with_colors() {
    let imported = document(
        r#"<svg>
            <path id="path1" fill="blue" d="M 0,10 v 3"/>
            <path id="path2" fill="none" stroke="red" d="M 0,0 v 2 h 2 z"/>
        </svg>"#,
    );
    assert_eq!(imported.len(), 2);
    assert!(imported[0].is_face());
    assert_eq!(
        imported[0].color().map(Color::to_tuple),
        Some((0.0, 0.0, 1.0, 1.0))
    );
    assert!(!imported[1].is_face());
    assert_eq!(
        imported[1].color().map(Color::to_tuple),
        Some((1.0, 0.0, 0.0, 1.0))
    );
}

#[test]
fn non_path_shapes() {
    let imported = document(
        r#"<svg>
            <rect id="rect1" x="0" y="1" width="2" height="3"/>
            <circle id="circle1" cx="4" cy="5" r="6"/>
        </svg>"#,
    );
    assert_eq!(imported.len(), 2);
    assert!(imported.iter().all(Shape::is_face));
    let circle = imported[1].as_face().expect("face");
    assert!((circle.area() - PI * 36.0).abs() < 1e-6);
}

#[test]
fn hidden_elements_contribute_nothing() {
    let imported = document(
        r#"<svg>
            <path visibility="hidden" d="M 0,0 h 1 v 1 z"/>
            <g style="visibility:hidden"><rect width="1" height="1"/></g>
        </svg>"#,
    );
    assert!(imported.is_empty());
}

#[test]
fn doc_file_not_found() {
    let err = import_svg_file("not/an/existing/file.svg", ImportOptions::default())
        .err()
        .expect("io error");
    assert_eq!(err.kind(), ImportErrorKind::Io);
}

#[test]
fn doc_syntax_error() {
    let err = import_svg_str(r#"<svg><path d="M 0,1 L 2,3"/>"#, ImportOptions::default())
        .find_map(Result::err)
        .expect("syntax error");
    assert_eq!(err.kind(), ImportErrorKind::Syntax);
}

#[test]
fn path_syntax_error() {
    let err = wires_from_svg_path("M 0,0 FFF 1 h 1", TOL)
        .find_map(Result::err)
        .expect("syntax error");
    assert_eq!(err.kind(), ImportErrorKind::Syntax);
}

#[test]
fn simple_path_to_wire() {
    let res: Vec<_> = wires_from_svg_path("M 0,0 v 1 h 1", TOL)
        .collect::<Result<_, _>>()
        .expect("wires");
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].vertex_count(), 3);
}

#[test]
fn closed_polygon_wire_vertices_match_line_count() {
    for (d, lines) in [
        ("M 0,0 L 4,0 L 4,3 Z", 3),
        ("M 0,0 h 2 v 2 h -2 z", 4),
        ("M 0,0 L 5,0 L 6,2 L 3,5 L 0,2 Z", 5),
    ] {
        let res: Vec<_> = wires_from_svg_path(d, TOL)
            .collect::<Result<_, _>>()
            .expect("wires");
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].vertex_count(), lines, "{d}");
    }
}

#[test]
fn arc_flags() {
    let c = PI * 45.0 * 45.0;
    let s = 90.0 * 90.0;
    let cases = [
        ("M  80  80 A 45 45, 0, 0, 0, 125 125 L 125  80 Z", c / 4.0),
        ("M 230  80 A 45 45, 0, 1, 0, 275 125 L 275  80 Z", 3.0 / 4.0 * c + s / 4.0),
        ("M  80 230 A 45 45, 0, 0, 1, 125 275 L 125 230 Z", (s - c) / 4.0),
        ("M 230 230 A 45 45, 0, 1, 1, 275 275 L 275 230 Z", 3.0 / 4.0 * c),
    ];
    for (path, area) in cases {
        let res = faces(path);
        assert_eq!(res.len(), 1);
        assert!((res[0].area() - area).abs() < 1e-6, "{path}");
    }
}

#[test]
fn arcs_path_to_wire() {
    let d = "M 10 315 L 110 215\
        A 30 50 0 0 1 162.55 162.45\
        L 172.55 152.45\
        A 30 50 -45 0 1 215.1 109.9\
        L 315 10";
    let res: Vec<_> = wires_from_svg_path(d, TOL)
        .collect::<Result<_, _>>()
        .expect("wires");
    assert_eq!(res.len(), 1);
    assert!(!res[0].is_closed());
}

#[test]
fn empty_paths() {
    assert_eq!(edges_from_svg_path("").count(), 0);
    assert_eq!(wires_from_svg_path("", TOL).count(), 0);
    assert_eq!(faces_from_svg_path("", TOL).count(), 0);
}

#[test]
fn simple_path_to_face() {
    assert_eq!(faces("M 0,0 v 1 h 1 z").len(), 1);
}

#[test]
fn simple_open_path_to_face() {
    let mut iter = faces_from_svg_path("M 0,0 v 1 h 1", TOL);
    let res: Vec<_> = iter.by_ref().collect::<Result<_, _>>().expect("faces");
    assert_eq!(res.len(), 1);
    assert_eq!(iter.diagnostics().forced_closure_count, 1);
}

#[test]
fn complex_path_to_wires() {
    assert_eq!(wires_from_svg_path("M 0,0 v 1 M 1,0 v 2", TOL).count(), 2);
    assert_eq!(wires_from_svg_path("M 0,0 v 1 h 1 z M 2,0 v 1 h 1", TOL).count(), 2);
}

#[test]
fn complex_path_to_wonky_faces() {
    assert_eq!(faces("M 0,0 v 1 M 1,0 v 2").len(), 2);
}

#[test]
fn concentric_path_nesting_even() {
    let n = 3;
    assert_eq!(hole_counts(&faces(&nested_squares_path(n * 2))), vec![1; n]);
}

#[test]
fn concentric_path_nesting_odd() {
    let n = 3;
    let mut expected = vec![0];
    expected.extend(vec![1; n]);
    assert_eq!(hole_counts(&faces(&nested_squares_path(n * 2 + 1))), expected);
}

#[test]
fn thin_ring_with_rotated_start() {
    let d = format!("{} {}", circle_path(100.0, 0.0), circle_path(99.9, 2.8125));
    let res = faces(&d);
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].inner_wires().len(), 1);
    let expected = PI * (100.0 * 100.0 - 99.9 * 99.9);
    assert!((res[0].area() - expected).abs() < 1e-6, "{}", res[0].area());
}

#[test]
fn concentric_circle_nesting() {
    let circles = |count: usize| {
        (1..=count)
            .map(|k| circle_path(10.0 * k as f64, 5.0 * k as f64))
            .collect::<Vec<_>>()
            .join(" ")
    };
    assert_eq!(hole_counts(&faces(&circles(6))), vec![1; 3]);
    assert_eq!(hole_counts(&faces(&circles(7))), vec![0, 1, 1, 1]);
}

#[test]
fn bezier_loop_inside_thin_circle() {
    // vier kubische bogen rond een cirkel met straal 50, maximaal ~0.014 te groot
    let k = 50.0 * 0.552_284_749_8;
    let bezier = format!(
        "M 50,0 C 50,{k} {k},50 0,50 C -{k},50 -50,{k} -50,0 \
         C -50,-{k} -{k},-50 0,-50 C {k},-50 50,-{k} 50,0 Z"
    );
    let d = format!("{} {bezier}", circle_path(50.05, 45.0));
    let res = faces(&d);
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].inner_wires().len(), 1);
}

#[test]
fn path_nesting() {
    let res = faces(
        "M 1,4 L 16,4 L 16,13 L 1,13 L 1,4 Z\
         M 2,5 L 15,5 L 15,12 L 2,12 L 2,5 Z\
         M 11,8 L 14,8 L 14,11 L 11,11 L 11,8 Z\
         M 11,6 L 14,6 L 14,7 L 11,7 L 11,6 Z\
         M 3,6 L 10,6 L 10,11 L 3,11 L 3,6 Z\
         M 7,8 L 9,8 L 9,10 L 7,10 L 7,8 Z\
         M 4,7 L 6,7 L 6,10 L 4,10 L 4,7 Z",
    );
    assert_eq!(hole_counts(&res), vec![0, 0, 1, 2]);
}

#[test]
fn mirroring_keeps_area() {
    let svg = r#"<svg><path d="M 80 80 A 45 45 0 0 0 125 125 L 125 80 Z"/></svg>"#;
    let mirrored = document(svg);
    let plain: Vec<_> = import_svg_str(svg, ImportOptions::default().with_mirror(false))
        .collect::<Result<_, _>>()
        .expect("import");

    let a = mirrored[0].as_face().expect("face");
    let b = plain[0].as_face().expect("face");
    assert!((a.area() - b.area()).abs() < 1e-9);

    let ya = a.bounding_box().expect("bbox");
    let yb = b.bounding_box().expect("bbox");
    assert!((ya.min.y + yb.max.y).abs() < 1e-9);
    assert!((ya.max.y + yb.min.y).abs() < 1e-9);
}
