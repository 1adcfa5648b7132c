mod common;

use pathgraph::{
    normalize_descriptor, Document, EdgeKind, EditorConfig, Path, PathError, Rect, TransformOptions,
    Vec2,
};

#[test]
fn square_example() {
    common::init_tracing();
    let mut doc = Document::new();
    let id = doc.insert("M 0 0 L 10 0 L 10 10 L 0 10 Z", 0).expect("path");
    let p = doc.path(id).unwrap();
    assert_eq!(p.vertex_count(), 4);
    assert_eq!(p.edge_count(), 4);
    assert!(p.subpaths()[0].closed);
    assert_eq!(
        p.bbox(),
        Some(Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0
        })
    );

    let snap = doc.snapshot(id).unwrap();
    doc.transform(&snap, &TransformOptions::translate(Vec2::new(5.0, 0.0)))
        .unwrap();
    assert_eq!(
        doc.path(id).unwrap().bbox(),
        Some(Rect {
            x: 5.0,
            y: 0.0,
            width: 10.0,
            height: 10.0
        })
    );
}

#[test]
fn mixed_commands_build_expected_edges() {
    common::init_tracing();
    let cfg = EditorConfig::default();
    let p = Path::parse_strict("M0,0 h10 q5,5 10,0 a5 5 0 0 1 10 0 v-20 z", &cfg).unwrap();
    let kinds: Vec<&str> = p
        .edge_ids()
        .map(|e| match p.edge(e).unwrap().kind {
            EdgeKind::Line => "line",
            EdgeKind::Cubic { .. } => "cubic",
            EdgeKind::Arc(_) => "arc",
        })
        .collect();
    assert_eq!(kinds, vec!["line", "cubic", "arc", "line", "line"]);
    assert_eq!(p.vertex_count(), 5);
    p.check_invariants().unwrap();
}

#[test]
fn every_subpath_obeys_cardinality() {
    common::init_tracing();
    let cfg = EditorConfig::default();
    let d = "M 0 0 L 1 0 L 1 1 Z M 5 5 L 6 6 L 7 5 M 9 9 m 1 1 l 2 2 z M 20 20";
    let p = Path::parse_strict(d, &cfg).unwrap();
    for sp in p.subpaths() {
        if sp.closed {
            assert_eq!(sp.vertices.len(), sp.edges.len());
        } else {
            assert_eq!(sp.vertices.len(), sp.edges.len() + 1);
        }
    }
    p.check_invariants().unwrap();
}

#[test]
fn descriptor_output_is_canonical() {
    common::init_tracing();
    let cfg = EditorConfig::default();
    let d = "m 10 10 h 5 v 5 h -5 z m 30 0 l 5 5";
    let p = Path::parse_strict(d, &cfg).unwrap();
    let out = p.to_descriptor();
    assert_eq!(out, normalize_descriptor(d, &cfg).unwrap());
    assert_eq!(
        out,
        "M 10 10 L 15 10 L 15 15 L 10 15 L 10 10 Z M 40 10 L 45 15"
    );
}

#[test]
fn degenerate_inputs_create_nothing() {
    common::init_tracing();
    let mut doc = Document::new();
    for d in [
        "",
        "   ",
        "Z",
        "Z Z z",
        "X 1 2 3",
        "M",
        "L 1",
        "1 2 3 4",
        "M 0 0 c 10 0 10 10 0 0 z",
    ] {
        assert!(doc.insert(d, 0).is_none(), "{:?}", d);
    }
    assert!(doc.is_empty());
}

#[test]
fn rejection_reasons_are_reported() {
    common::init_tracing();
    let mut doc = Document::new();
    assert!(matches!(doc.insert_strict("", 0), Err(PathError::EmptyDescriptor)));
    assert!(matches!(
        doc.insert_strict("M 0 0 C 10 0 10 10 0 0 Z", 0),
        Err(PathError::DegenerateSubpath { vertices: 1, .. })
    ));
}
