#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use pathgraph_wasm::Editor;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

#[wasm_bindgen_test]
fn invalid_ids_return_typed_errors() {
    let mut ed = Editor::new();
    let ver = ed.version();
    assert!(is_err(&ed.descriptor_res(7), "invalid_id"));
    assert!(is_err(&ed.delete_vertex_res(7, 0), "invalid_id"));
    assert!(is_err(&ed.split_edge_res(7, 0, 1.0, 1.0), "invalid_id"));
    assert!(is_err(&ed.remove_res(0), "out_of_range"));
    assert_eq!(ed.version(), ver, "state mutated on error");

    let id = ed.insert("M 0 0 L 10 0 L 10 10 Z", 0).unwrap();
    let ver = ed.version();
    assert!(is_err(&ed.split_edge_res(id, 99, 1.0, 1.0), "invalid_id"));
    assert!(is_err(&ed.delete_vertex_res(id, 99), "invalid_id"));
    assert!(is_err(&ed.split_edge_res(id, 0, f32::NAN, 1.0), "non_finite"));
    assert!(is_err(&ed.set_control_point_res(id, 0, 0, 1.0, 1.0), "not_cubic"));
    assert!(is_err(&ed.set_control_point_res(id, 0, 2, 1.0, 1.0), "invalid_end"));
    assert!(is_err(&ed.transform_res(id, f32::INFINITY, 0.0, 1.0, None, 0.0, None, None), "non_finite"));
    assert_eq!(ed.version(), ver);
}

#[wasm_bindgen_test]
fn ingestion_errors_carry_engine_codes() {
    let mut ed = Editor::new();
    assert!(is_err(&ed.insert_res("", 0), "empty_descriptor"));
    assert!(is_err(&ed.insert_res("M 0 0 C 10 0 10 10 0 0 Z", 0), "degenerate_subpath"));
    assert!(is_err(&ed.insert_res("M 0 0 L 1e9 0", 0), "out_of_range"));
    assert_eq!(ed.path_count(), 0);

    let mut small = Editor::with_config(r#"{"max_commands": 2}"#).unwrap();
    assert!(is_err(&small.insert_res("M 0 0 L 1 1 L 2 2", 0), "limit_exceeded"));
    assert!(Editor::with_config(r#"{"close_epsilon": -1}"#).is_err());
}

#[wasm_bindgen_test]
fn second_pointer_down_is_busy() {
    let mut ed = Editor::new();
    assert_eq!(ed.pointer_down(None, 0.0, 0.0, 0).as_deref(), Some("create"));
    assert!(is_err(&ed.pointer_down_res(None, 1.0, 1.0, 0), "busy"));
    assert!(ed.cancel());
    assert!(is_err(&ed.pointer_down_res(Some(12345), 1.0, 1.0, 0), "invalid_handle"));
}
