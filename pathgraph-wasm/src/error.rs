use crate::interop::{new_obj, num, set_kv};
use pathgraph::PathError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    set_kv(&root, "error", &e.into());
    root.into()
}

/// `data` object from key/value pairs.
fn fields(kv: &[(&str, JsValue)]) -> JsValue {
    let d = new_obj();
    for (k, v) in kv { set_kv(&d, k, v); }
    d.into()
}

fn param(name: &str) -> (&'static str, JsValue) { ("param", JsValue::from_str(name)) }

#[inline]
pub fn non_finite(name: &str) -> JsValue {
    err("non_finite", format!("parameter '{}' must be finite", name), Some(fields(&[param(name)])))
}

#[inline]
pub fn out_of_range(name: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = fields(&[param(name), ("min", num(min)), ("max", num(max)), ("got", num(got))]);
    err("out_of_range", format!("parameter '{}' out of range", name), Some(d))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = fields(&[("kind", JsValue::from_str(kind)), ("id", num(id))]);
    err("invalid_id", format!("invalid {} id", kind), Some(d))
}

#[inline]
pub fn invalid_end(got: u8) -> JsValue {
    err("invalid_end", "end must be 0:start or 1:end", Some(fields(&[("got", num(got))])))
}

#[inline]
pub fn not_cubic(edge: u32) -> JsValue {
    err("not_cubic", "edge is not cubic", Some(fields(&[("edge", num(edge))])))
}

#[inline]
pub fn busy() -> JsValue { err("busy", "a drag is already in progress", None) }

/// Envelope for an engine error, keyed by [`PathError::code`].
pub fn from_path_error(e: &PathError) -> JsValue {
    let d = match e {
        PathError::DegenerateSubpath { subpath, vertices, length } => Some(fields(&[
            ("subpath", num(*subpath as f64)),
            ("vertices", num(*vertices as f64)),
            ("length", num(*length)),
        ])),
        PathError::LimitExceeded { what, limit } => Some(fields(&[
            ("what", JsValue::from_str(what)),
            ("limit", num(*limit as f64)),
        ])),
        PathError::CoordinateOutOfRange { value } => Some(fields(&[("got", num(*value))])),
        PathError::NonFinite(name) => Some(fields(&[param(name)])),
        _ => None,
    };
    err(e.code(), e.to_string(), d)
}
