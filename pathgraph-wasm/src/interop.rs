use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn num(v: impl Into<f64>) -> JsValue { JsValue::from_f64(v.into()) }
/// Serialize to a JS value; values that cannot cross the boundary become `null`.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or_else(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&format!("pathgraph: serialize failed: {}", e)));
        JsValue::NULL
    })
}
