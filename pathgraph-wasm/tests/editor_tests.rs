#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect};
use pathgraph_wasm::{normalize_descriptor, Editor};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn value(v: &JsValue) -> JsValue {
    Reflect::get(v, &JsValue::from_str("value")).unwrap()
}

#[derive(Deserialize)]
struct Change {
    kind: String,
    path: Option<u32>,
}

#[derive(Deserialize)]
struct Bbox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[wasm_bindgen_test]
fn insert_transform_and_descriptor() {
    let mut ed = Editor::new();
    let id = ed.insert("m 0 0 h 10 v 10 h -10 z", 0).unwrap();
    assert_eq!(
        ed.descriptor(id).unwrap(),
        "M 0 0 L 10 0 L 10 10 L 0 10 L 0 0 Z"
    );
    assert!(ed.transform(id, 5.0, 0.0, 1.0, None, 0.0, None, None));
    assert!(ed.transform(id, 10.0, 0.0, 1.0, None, 0.0, None, None));
    assert_eq!(
        ed.descriptor(id).unwrap(),
        "M 10 0 L 20 0 L 20 10 L 10 10 L 10 0 Z"
    );
    assert!(ed.cancel_transform(id));
    assert_eq!(
        ed.descriptor(id).unwrap(),
        "M 0 0 L 10 0 L 10 10 L 0 10 L 0 0 Z"
    );

    let changes: Vec<Change> = serde_wasm_bindgen::from_value(ed.take_changes()).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, "insert");
    assert_eq!(changes[0].path, Some(id));
}

#[wasm_bindgen_test]
fn visuals_resolve_and_drive_a_drag() {
    let mut ed = Editor::new();
    let id = ed.insert("M 0 0 L 10 0 L 10 10 L 0 10 Z", 0).unwrap();
    let vis = Array::from(&ed.visuals());
    assert_eq!(vis.length(), 9);

    // find the path visual and drag it
    let mut path_handle = None;
    for v in vis.iter() {
        let kind = Reflect::get(&v, &JsValue::from_str("kind")).unwrap();
        if kind.as_string().as_deref() == Some("path") {
            let h = Reflect::get(&v, &JsValue::from_str("handle")).unwrap();
            path_handle = h.as_f64().map(|h| h as u64);
        }
    }
    let h = path_handle.unwrap();
    let entity = ed.resolve(h);
    let kind = Reflect::get(&entity, &JsValue::from_str("kind")).unwrap();
    assert_eq!(kind.as_string().as_deref(), Some("path"));

    assert_eq!(ed.pointer_down(Some(h), 5.0, 5.0, 0).as_deref(), Some("path"));
    assert!(ed.pointer_move(3.0, 4.0, 0));
    assert!(ed.commit());
    let b: Bbox = serde_wasm_bindgen::from_value(ed.bounding_box(h)).unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (3.0, 4.0, 10.0, 10.0));
    assert_eq!(ed.selected(), Some(id));
}

#[wasm_bindgen_test]
fn split_and_delete_through_bindings() {
    let mut ed = Editor::new();
    let id = ed.create_rect_path(0.0, 0.0, 10.0, 10.0);
    let r = ed.split_edge_res(id, 0, 5.0, 0.0);
    let v = value(&r).as_f64().unwrap() as u32;
    assert_eq!(ed.delete_vertex(id, v), "merged");
    assert_eq!(
        ed.descriptor(id).unwrap(),
        "M 0 0 L 10 0 L 10 10 L 0 10 L 0 0 Z"
    );
}

#[wasm_bindgen_test]
fn free_normalize() {
    let a = value(&normalize_descriptor("M 0 0 q 5 5 10 0")).as_string().unwrap();
    let b = value(&normalize_descriptor("M 0 0 Q 5 5 10 0")).as_string().unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("M 0 0 C "));
}

#[wasm_bindgen_test]
fn edits_elsewhere_keep_pending_transform() {
    let mut ed = Editor::new();
    let a = ed.insert("M 0 0 L 10 0 L 10 10 Z", 0).unwrap();
    let b = ed.insert("M 50 50 L 60 50 L 60 60 Z", 1).unwrap();
    ed.take_changes();

    assert!(ed.transform(a, 5.0, 0.0, 1.0, None, 0.0, None, None));
    assert!(ed.split_edge(b, 0, 55.0, 50.0).is_some());
    assert_eq!(ed.delete_vertex(b, 1), "merged");
    assert!(ed.end_transform(a));

    let changes: Vec<Change> = serde_wasm_bindgen::from_value(ed.take_changes()).unwrap();
    let last = changes.last().unwrap();
    assert_eq!(last.kind, "transform");
    assert_eq!(last.path, Some(a));
}

#[wasm_bindgen_test]
fn editing_a_transformed_path_commits_the_transform() {
    let mut ed = Editor::new();
    let a = ed.insert("M 0 0 L 10 0 L 10 10 Z", 0).unwrap();
    ed.take_changes();
    assert!(ed.transform(a, 5.0, 0.0, 1.0, None, 0.0, None, None));
    assert!(ed.split_edge(a, 0, 10.0, 0.0).is_some());
    let changes: Vec<Change> = serde_wasm_bindgen::from_value(ed.take_changes()).unwrap();
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|c| c.kind == "transform" && c.path == Some(a)));
    assert!(!ed.end_transform(a));
}
