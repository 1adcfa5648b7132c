use crate::error;
use crate::interop::{new_obj, num, set_kv, to_js};
use crate::Editor;
use pathgraph::{
    DeleteOutcome, EdgeId, EdgeKind, EditorConfig, Entity, HandleEnd, Modifiers, PathId,
    Rotation, TransformOptions, Vec2, VertexId, VisualHandle,
};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Canonical absolute form of a descriptor, as `{ok, value}`.
#[wasm_bindgen]
pub fn normalize_descriptor(d: &str) -> JsValue {
    match pathgraph::normalize_descriptor(d, &EditorConfig::default()) {
        Ok(s) => error::ok(JsValue::from_str(&s)),
        Err(e) => error::from_path_error(&e),
    }
}

fn outcome_str(o: DeleteOutcome) -> &'static str {
    match o {
        DeleteOutcome::NotFound => "not_found",
        DeleteOutcome::Merged => "merged",
        DeleteOutcome::SubpathRemoved => "subpath_removed",
        DeleteOutcome::PathEmptied => "path_emptied",
    }
}

// Bit 0 split, bit 1 scale, bit 2 rotate.
fn modifiers(bits: u8) -> Modifiers {
    Modifiers {
        split: bits & 1 != 0,
        scale: bits & 2 != 0,
        rotate: bits & 4 != 0,
    }
}

fn transform_options(
    dx: f32,
    dy: f32,
    scale_x: f32,
    scale_y: Option<f32>,
    degrees: f32,
    cx: Option<f32>,
    cy: Option<f32>,
) -> TransformOptions {
    TransformOptions {
        center: match (cx, cy) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        },
        offset: Vec2::new(dx, dy),
        scale_x,
        scale_y,
        rotation: (degrees != 0.0).then_some(Rotation::Degrees(degrees)),
    }
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor::rs_new(EditorConfig::default())
    }
    /// Editor with tolerances and limits from a JSON object string. Fails
    /// with an `invalid_config` envelope.
    pub fn with_config(json: &str) -> Result<Editor, JsValue> {
        match EditorConfig::from_json_str(json) {
            Ok(cfg) => Ok(Editor::rs_new(cfg)),
            Err(e) => Err(error::from_path_error(&e)),
        }
    }
    pub fn version(&self) -> u64 {
        self.rs_version()
    }
    pub fn path_count(&self) -> u32 {
        self.inner.len() as u32
    }
    pub fn path_ids(&self) -> Vec<u32> {
        self.inner.iter().map(|p| p.id().0).collect()
    }

    // Paths
    pub fn insert(&mut self, d: &str, index: u32) -> Option<u32> {
        self.inner.insert(d, index as usize).map(|id| id.0)
    }
    pub fn insert_res(&mut self, d: &str, index: u32) -> JsValue {
        match self.inner.insert_strict(d, index as usize) {
            Ok(id) => error::ok(num(id.0)),
            Err(e) => error::from_path_error(&e),
        }
    }
    pub fn remove(&mut self, index: u32) -> bool {
        if let Some(id) = self.inner.get(index as usize).map(|p| p.id()) {
            self.snapshots.remove(&id);
        }
        self.inner.remove(index as usize)
    }
    pub fn remove_res(&mut self, index: u32) -> JsValue {
        let len = self.inner.len();
        if index as usize >= len {
            return error::out_of_range("index", 0.0, len as f64, index as f64);
        }
        error::ok(JsValue::from_bool(self.remove(index)))
    }
    pub fn remove_path(&mut self, id: u32) -> bool {
        self.snapshots.remove(&PathId(id));
        self.inner.remove_path(PathId(id))
    }
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.session.cancel(&mut self.inner);
        self.inner.clear();
    }
    pub fn descriptor(&self, id: u32) -> Option<String> {
        self.inner.descriptor(PathId(id))
    }
    pub fn descriptor_res(&self, id: u32) -> JsValue {
        match self.inner.descriptor(PathId(id)) {
            Some(d) => error::ok(JsValue::from_str(&d)),
            None => error::invalid_id("path", id),
        }
    }
    pub fn create_rect_path(&mut self, left: f32, top: f32, right: f32, bottom: f32) -> u32 {
        self.inner.create_rect_path(left, top, right, bottom).0
    }
    pub fn create_rect_path_res(&mut self, left: f32, top: f32, right: f32, bottom: f32) -> JsValue {
        for (name, v) in [("left", left), ("top", top), ("right", right), ("bottom", bottom)] {
            if !v.is_finite() {
                return error::non_finite(name);
            }
        }
        error::ok(num(self.create_rect_path(left, top, right, bottom)))
    }
    pub fn select(&mut self, id: Option<u32>) -> bool {
        self.inner.select(id.map(PathId))
    }
    pub fn selected(&self) -> Option<u32> {
        self.inner.selected().map(|id| id.0)
    }

    // Topology
    pub fn split_edge(&mut self, path: u32, edge: u32, x: f32, y: f32) -> Option<u32> {
        self.settle(PathId(path));
        self.inner
            .split_edge(PathId(path), EdgeId(edge), Vec2::new(x, y))
            .map(|v| v.0)
    }
    pub fn split_edge_res(&mut self, path: u32, edge: u32, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        let Some(p) = self.inner.path(PathId(path)) else {
            return error::invalid_id("path", path);
        };
        if p.edge(EdgeId(edge)).is_none() {
            return error::invalid_id("edge", edge);
        }
        match self.split_edge(path, edge, x, y) {
            Some(v) => error::ok(num(v)),
            None => error::invalid_id("edge", edge),
        }
    }
    pub fn delete_vertex(&mut self, path: u32, vertex: u32) -> String {
        self.settle(PathId(path));
        outcome_str(self.inner.delete_vertex(PathId(path), VertexId(vertex))).to_string()
    }
    pub fn delete_vertex_res(&mut self, path: u32, vertex: u32) -> JsValue {
        let Some(p) = self.inner.path(PathId(path)) else {
            return error::invalid_id("path", path);
        };
        if p.vertex(VertexId(vertex)).is_none() {
            return error::invalid_id("vertex", vertex);
        }
        error::ok(JsValue::from_str(&self.delete_vertex(path, vertex)))
    }
    pub fn set_control_point_res(&mut self, path: u32, edge: u32, end: u8, x: f32, y: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        let end = match end {
            0 => HandleEnd::Start,
            1 => HandleEnd::End,
            other => return error::invalid_end(other),
        };
        let Some(p) = self.inner.path(PathId(path)) else {
            return error::invalid_id("path", path);
        };
        match p.edge(EdgeId(edge)) {
            None => return error::invalid_id("edge", edge),
            Some(e) if !matches!(e.kind, EdgeKind::Cubic { .. }) => return error::not_cubic(edge),
            Some(_) => {}
        }
        self.settle(PathId(path));
        let ok = self
            .inner
            .set_control_point(PathId(path), EdgeId(edge), end, Vec2::new(x, y));
        error::ok(JsValue::from_bool(ok))
    }

    // Programmatic transforms: every call re-applies from the baseline taken
    // at the first call, until end_transform or cancel_transform.
    #[allow(clippy::too_many_arguments)]
    pub fn transform(
        &mut self,
        path: u32,
        dx: f32,
        dy: f32,
        scale_x: f32,
        scale_y: Option<f32>,
        degrees: f32,
        cx: Option<f32>,
        cy: Option<f32>,
    ) -> bool {
        let opts = transform_options(dx, dy, scale_x, scale_y, degrees, cx, cy);
        self.apply(path, &opts).unwrap_or(false)
    }
    #[allow(clippy::too_many_arguments)]
    pub fn transform_res(
        &mut self,
        path: u32,
        dx: f32,
        dy: f32,
        scale_x: f32,
        scale_y: Option<f32>,
        degrees: f32,
        cx: Option<f32>,
        cy: Option<f32>,
    ) -> JsValue {
        if self.inner.path(PathId(path)).is_none() {
            return error::invalid_id("path", path);
        }
        let opts = transform_options(dx, dy, scale_x, scale_y, degrees, cx, cy);
        match self.apply(path, &opts) {
            Ok(changed) => error::ok(JsValue::from_bool(changed)),
            Err(e) => error::from_path_error(&e),
        }
    }
    pub fn end_transform(&mut self, path: u32) -> bool {
        if self.snapshots.remove(&PathId(path)).is_none() {
            return false;
        }
        self.inner.finish_transform(PathId(path));
        true
    }
    pub fn cancel_transform(&mut self, path: u32) -> bool {
        let Some(snap) = self.snapshots.remove(&PathId(path)) else {
            return false;
        };
        self.inner
            .transform(&snap, &TransformOptions::default())
            .unwrap_or(false)
    }

    // Pointer sessions. `handle` is the visual under the pointer, or
    // undefined for empty canvas.
    pub fn pointer_down(&mut self, handle: Option<u64>, x: f32, y: f32, mods: u8) -> Option<String> {
        let target = match handle {
            None => Entity::Root,
            Some(h) => self.inner.resolve(VisualHandle(h))?,
        };
        if let Some(id) = target.path() {
            self.settle(id);
        }
        self.session
            .pointer_down(&mut self.inner, target, Vec2::new(x, y), modifiers(mods))
            .map(|k| format!("{:?}", k).to_lowercase())
    }
    pub fn pointer_down_res(&mut self, handle: Option<u64>, x: f32, y: f32, mods: u8) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !self.session.is_idle() {
            return error::busy();
        }
        if let Some(h) = handle {
            if self.inner.resolve(VisualHandle(h)).is_none() {
                let d = new_obj();
                set_kv(&d, "handle", &num(h as f64));
                return error::err("invalid_handle", "handle does not resolve", Some(d.into()));
            }
        }
        match self.pointer_down(handle, x, y, mods) {
            Some(kind) => error::ok(JsValue::from_str(&kind)),
            None => error::err("invalid_target", "target cannot be dragged", None),
        }
    }
    pub fn pointer_move(&mut self, dx: f32, dy: f32, mods: u8) -> bool {
        self.session
            .pointer_move(&mut self.inner, Vec2::new(dx, dy), modifiers(mods))
    }
    pub fn commit(&mut self) -> bool {
        self.session.commit(&mut self.inner)
    }
    pub fn cancel(&mut self) -> bool {
        self.session.cancel(&mut self.inner)
    }
    pub fn is_dragging(&self) -> bool {
        !self.session.is_idle()
    }

    // Host-facing views
    pub fn take_changes(&mut self) -> JsValue {
        to_js(&self.inner.take_changes())
    }
    /// `[{handle, kind, params}]` for every live visual, ordered by handle.
    pub fn visuals(&self) -> JsValue {
        let table = self.table.borrow();
        let arr = js_sys::Array::new();
        for (h, kind, params) in table.visuals() {
            let o = new_obj();
            set_kv(&o, "handle", &num(h.0 as f64));
            set_kv(&o, "kind", &to_js(&kind));
            set_kv(&o, "params", &to_js(params));
            arr.push(&o);
        }
        arr.into()
    }
    pub fn resolve(&self, handle: u64) -> JsValue {
        match self.inner.resolve(VisualHandle(handle)) {
            Some(e) => to_js(&e),
            None => JsValue::NULL,
        }
    }
    pub fn bounding_box(&self, handle: u64) -> JsValue {
        match self.inner.host().bounding_box(VisualHandle(handle)) {
            Some(r) => to_js(&r),
            None => JsValue::NULL,
        }
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}

impl Editor {
    fn apply(&mut self, path: u32, opts: &TransformOptions) -> pathgraph::Result<bool> {
        let id = PathId(path);
        if !self.snapshots.contains_key(&id) {
            let Some(snap) = self.inner.snapshot(id) else {
                return Ok(false);
            };
            self.snapshots.insert(id, snap);
        }
        match self.snapshots.get(&id) {
            Some(snap) => self.inner.transform(snap, opts),
            None => Ok(false),
        }
    }

    // Commit a pending programmatic transform on `id` before another edit
    // replaces its baseline.
    fn settle(&mut self, id: PathId) {
        if self.snapshots.remove(&id).is_some() {
            self.inner.finish_transform(id);
        }
    }
}
