//! Interactive drag sessions.
//!
//! `Idle → Dragging` on pointer-down over a resolved target, back to `Idle`
//! on commit or cancel. Every pointer move re-applies a transform from the
//! snapshot taken at pointer-down; cancel applies the identity transform and
//! undoes a speculative edge split.

use crate::algorithms::transform::{Rotation, Snapshot, TransformOptions};
use crate::document::Document;
use crate::geometry::tolerance::EPS_LEN;
use crate::host::ChangeKind;
use crate::model::{EdgeKind, Entity, PathId, Vec2, VertexId};
use crate::path::Path;
use tracing::{debug, warn};

/// Modifier-key state sampled with each pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Pointer-down on an edge splits it and drags the new vertex.
    pub split: bool,
    /// Path drags scale about the bbox center.
    pub scale: bool,
    /// Path drags rotate about the bbox center. Wins over `scale`.
    pub rotate: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Vertex,
    Edge,
    Path,
    Create,
}

#[derive(Debug)]
struct Drag {
    kind: DragKind,
    path: PathId,
    // None for create-drags, which reshape instead of transforming
    snapshot: Option<Snapshot>,
    origin: Vec2,
    total: Vec2,
    /// Vertex inserted by a split-drag and the kind of the edge it split.
    split: Option<(VertexId, EdgeKind)>,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Dragging(Drag),
}

#[derive(Debug, Default)]
pub struct EditSession {
    state: State,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    pub fn drag_kind(&self) -> Option<DragKind> {
        match &self.state {
            State::Idle => None,
            State::Dragging(d) => Some(d.kind),
        }
    }

    /// Path being dragged, if any.
    pub fn target_path(&self) -> Option<PathId> {
        match &self.state {
            State::Idle => None,
            State::Dragging(d) => Some(d.path),
        }
    }

    /// Start a drag on `target` at document point `at`. `None` when already
    /// dragging or when the target no longer exists.
    pub fn pointer_down(
        &mut self,
        doc: &mut Document,
        target: Entity,
        at: Vec2,
        mods: Modifiers,
    ) -> Option<DragKind> {
        if !self.is_idle() {
            debug!("pointer_down during a drag ignored");
            return None;
        }
        if !at.is_finite() {
            return None;
        }
        let drag = match target {
            Entity::Root => {
                let path = doc.register(Path::rect(at.x, at.y, at.x, at.y), usize::MAX);
                Drag {
                    kind: DragKind::Create,
                    path,
                    snapshot: None,
                    origin: at,
                    total: Vec2::ZERO,
                    split: None,
                }
            }
            Entity::Path { path } => {
                let snap = doc.snapshot(path)?;
                if doc.selected() != Some(path) {
                    doc.select(Some(path));
                }
                Drag {
                    kind: DragKind::Path,
                    path,
                    snapshot: Some(snap),
                    origin: at,
                    total: Vec2::ZERO,
                    split: None,
                }
            }
            Entity::Vertex { path, vertex } => Drag {
                kind: DragKind::Vertex,
                path,
                snapshot: Some(doc.snapshot_vertices(path, &[vertex])?),
                origin: at,
                total: Vec2::ZERO,
                split: None,
            },
            Entity::Edge { path, edge } => {
                let (snap, split) = if mods.split {
                    let kind = doc.path(path)?.edge(edge)?.kind;
                    let v = doc.split_edge_quiet(path, edge, at)?;
                    (doc.snapshot_vertices(path, &[v])?, Some((v, kind)))
                } else {
                    (doc.path(path)?.snapshot_edge(edge)?, None)
                };
                Drag {
                    kind: DragKind::Edge,
                    path,
                    snapshot: Some(snap),
                    origin: at,
                    total: Vec2::ZERO,
                    split,
                }
            }
        };
        let kind = drag.kind;
        self.state = State::Dragging(drag);
        Some(kind)
    }

    /// Feed one pointer move. `delta` is the movement since the previous event.
    pub fn pointer_move(&mut self, doc: &mut Document, delta: Vec2, mods: Modifiers) -> bool {
        let State::Dragging(drag) = &mut self.state else {
            return false;
        };
        if !delta.is_finite() {
            return false;
        }
        drag.total += delta;
        let cur = drag.origin + drag.total;
        if drag.kind == DragKind::Create {
            return doc.reshape_rect(drag.path, drag.origin, cur);
        }
        let Some(snap) = drag.snapshot.as_ref() else {
            return false;
        };
        let opts = match drag.kind {
            DragKind::Path => path_drag_options(snap.center(), drag.origin, cur, drag.total, mods),
            _ => TransformOptions::translate(drag.total),
        };
        doc.transform(snap, &opts).unwrap_or_else(|e| {
            warn!(code = e.code(), "drag transform rejected: {}", e);
            false
        })
    }

    /// Pointer-up: keep the result and queue its change notification.
    /// Returns `false` when idle or when a too-small create-drag is discarded.
    pub fn commit(&mut self, doc: &mut Document) -> bool {
        let State::Dragging(drag) = std::mem::take(&mut self.state) else {
            return false;
        };
        if drag.kind != DragKind::Create {
            doc.finish_transform(drag.path);
            return true;
        }
        let min = doc.config().min_create_size;
        let big_enough = doc
            .path(drag.path)
            .and_then(|p| p.bbox())
            .is_some_and(|b| b.width >= min && b.height >= min);
        if big_enough {
            doc.notify(ChangeKind::Insert, Some(drag.path));
            doc.select(Some(drag.path));
            true
        } else {
            debug!(path = drag.path.0, "create-drag below minimum size discarded");
            if let Some(i) = doc.index_of(drag.path) {
                doc.discard(i);
            }
            false
        }
    }

    /// Revert the drag in progress.
    pub fn cancel(&mut self, doc: &mut Document) -> bool {
        let State::Dragging(drag) = std::mem::take(&mut self.state) else {
            return false;
        };
        if drag.kind == DragKind::Create {
            if let Some(i) = doc.index_of(drag.path) {
                doc.discard(i);
            }
            return true;
        }
        if let Some(snap) = &drag.snapshot {
            if let Err(e) = doc.transform(snap, &TransformOptions::default()) {
                warn!(code = e.code(), "cancel transform rejected: {}", e);
            }
        }
        if let Some((v, kind)) = drag.split {
            doc.unsplit_quiet(drag.path, v, kind);
        }
        true
    }
}

/// Path drags translate by default; with modifiers they scale by the
/// distance ratio or rotate by the swept angle, both about `center`.
fn path_drag_options(
    center: Vec2,
    origin: Vec2,
    cur: Vec2,
    total: Vec2,
    mods: Modifiers,
) -> TransformOptions {
    let a = origin - center;
    let b = cur - center;
    let (la, lb) = (a.length(), b.length());
    if mods.rotate {
        if la <= EPS_LEN || lb <= EPS_LEN {
            return TransformOptions::default();
        }
        let sin = (a.x * b.y - a.y * b.x) / (la * lb);
        let cos = (a.x * b.x + a.y * b.y) / (la * lb);
        TransformOptions::rotate(Rotation::SinCos { sin, cos })
    } else if mods.scale {
        if la <= EPS_LEN {
            return TransformOptions::default();
        }
        TransformOptions::scale(lb / la)
    } else {
        TransformOptions::translate(total)
    }
}
