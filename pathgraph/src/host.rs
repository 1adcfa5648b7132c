//! Render-host boundary.
//!
//! The engine never draws. It asks a [`RenderHost`] for an opaque handle per
//! path, vertex and edge, pushes fresh geometry on every mutation, and gives
//! the handle back when the entity goes away. Input events arrive as handles
//! and are mapped back to entities through the host.

use crate::model::{Bounds, EdgeKind, Entity, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    Path,
    Vertex,
    Edge,
}

/// Geometry pushed to the host for one visual.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VisualParams {
    Path {
        entity: Entity,
        descriptor: String,
        bbox: Option<Rect>,
        selected: bool,
    },
    Vertex {
        entity: Entity,
        pos: Vec2,
        smooth: bool,
    },
    Edge {
        entity: Entity,
        from: Vec2,
        to: Vec2,
        curve: EdgeKind,
    },
}

impl VisualParams {
    pub fn entity(&self) -> Entity {
        match *self {
            VisualParams::Path { entity, .. }
            | VisualParams::Vertex { entity, .. }
            | VisualParams::Edge { entity, .. } => entity,
        }
    }

    /// Loose extent of the visual. Edge curves use their control hull.
    pub fn extent(&self) -> Option<Rect> {
        match self {
            VisualParams::Path { bbox, .. } => *bbox,
            VisualParams::Vertex { pos, .. } => Some(Rect::from_bounds(pos.x, pos.y, pos.x, pos.y)),
            VisualParams::Edge { from, to, curve, .. } => {
                let mut b = Bounds::empty();
                b.include(*from);
                b.include(*to);
                if let EdgeKind::Cubic { ha, hb } = curve {
                    b.include(*from + *ha);
                    b.include(*to + *hb);
                }
                b.to_rect()
            }
        }
    }
}

pub trait RenderHost {
    fn create_visual(&mut self, kind: VisualKind, params: &VisualParams) -> VisualHandle;
    fn update_visual(&mut self, handle: VisualHandle, params: &VisualParams);
    fn remove_visual(&mut self, handle: VisualHandle);
    /// Map a handle from an input event back to the entity it renders.
    fn resolve_handle(&self, handle: VisualHandle) -> Option<Entity>;
    fn bounding_box(&self, handle: VisualHandle) -> Option<Rect>;
}

/// In-memory host that records the latest params for each live handle.
/// Used headless and as the backing store of the wasm bindings.
#[derive(Debug, Default)]
pub struct HandleTable {
    next: u64,
    visuals: HashMap<VisualHandle, (VisualKind, VisualParams)>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<(VisualKind, &VisualParams)> {
        self.visuals.get(&handle).map(|(k, p)| (*k, p))
    }

    /// Live visuals sorted by handle.
    pub fn visuals(&self) -> Vec<(VisualHandle, VisualKind, &VisualParams)> {
        let mut v: Vec<_> = self.visuals.iter().map(|(h, (k, p))| (*h, *k, p)).collect();
        v.sort_by_key(|(h, _, _)| *h);
        v
    }
}

impl RenderHost for HandleTable {
    fn create_visual(&mut self, kind: VisualKind, params: &VisualParams) -> VisualHandle {
        self.next += 1;
        let h = VisualHandle(self.next);
        self.visuals.insert(h, (kind, params.clone()));
        h
    }

    fn update_visual(&mut self, handle: VisualHandle, params: &VisualParams) {
        if let Some(slot) = self.visuals.get_mut(&handle) {
            slot.1 = params.clone();
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        self.visuals.remove(&handle);
    }

    fn resolve_handle(&self, handle: VisualHandle) -> Option<Entity> {
        self.visuals.get(&handle).map(|(_, p)| p.entity())
    }

    fn bounding_box(&self, handle: VisualHandle) -> Option<Rect> {
        self.visuals.get(&handle).and_then(|(_, p)| p.extent())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Clear,
    Insert,
    Remove,
    Transform,
    Select,
}

/// Emitted after every committed document mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub kind: ChangeKind,
    pub path: Option<crate::model::PathId>,
}
