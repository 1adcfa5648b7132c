//! The path collection: ordered paths, selection, render-host sync and the
//! change queue.

use crate::algorithms::topology::DeleteOutcome;
use crate::algorithms::transform::{Snapshot, TransformOptions};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::host::{
    ChangeKind, ChangeNotification, HandleTable, RenderHost, VisualHandle, VisualKind, VisualParams,
};
use crate::model::{EdgeId, EdgeKind, Entity, PathCommand, PathId, Rect, Vec2, VertexId};
use crate::path::{HandleEnd, Path};
use tracing::{debug, warn};

pub struct Document {
    paths: Vec<Path>,
    next_id: u32,
    config: EditorConfig,
    host: Box<dyn RenderHost>,
    changes: Vec<ChangeNotification>,
    version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), Box::new(HandleTable::new()))
    }

    pub fn with_config(config: EditorConfig, host: Box<dyn RenderHost>) -> Self {
        Document {
            paths: Vec::new(),
            next_id: 1,
            config,
            host,
            changes: Vec::new(),
            version: 0,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn RenderHost {
        &*self.host
    }

    pub fn host_mut(&mut self) -> &mut dyn RenderHost {
        &mut *self.host
    }

    /// Incremented on every committed mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    pub fn path(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PathId) -> Option<usize> {
        self.paths.iter().position(|p| p.id == id)
    }

    pub fn descriptor(&self, id: PathId) -> Option<String> {
        self.path(id).map(|p| p.to_descriptor())
    }

    /// Drain queued change notifications, oldest first.
    pub fn take_changes(&mut self) -> Vec<ChangeNotification> {
        std::mem::take(&mut self.changes)
    }

    pub(crate) fn notify(&mut self, kind: ChangeKind, path: Option<PathId>) {
        self.version += 1;
        self.changes.push(ChangeNotification { kind, path });
    }

    /// Entity behind a host handle.
    pub fn resolve(&self, handle: VisualHandle) -> Option<Entity> {
        self.host.resolve_handle(handle)
    }

    /// Host-reported bounding box of an entity's visual.
    pub fn bounding_box(&self, entity: Entity) -> Option<Rect> {
        let p = self.path(entity.path()?)?;
        let h = match entity {
            Entity::Root => None,
            Entity::Path { .. } => p.visual(),
            Entity::Vertex { vertex, .. } => p.vertex(vertex).and_then(|v| v.visual()),
            Entity::Edge { edge, .. } => p.edge(edge).and_then(|e| e.visual()),
        }?;
        self.host.bounding_box(h)
    }

    /// Parse and insert at `index` (clamped to `[0, len]`). `None` when the
    /// descriptor does not yield a valid path.
    pub fn insert(&mut self, d: &str, index: usize) -> Option<PathId> {
        self.insert_strict(d, index).ok()
    }

    pub fn insert_strict(&mut self, d: &str, index: usize) -> Result<PathId> {
        let path = Path::parse_strict(d, &self.config)?;
        Ok(self.insert_path(path, index))
    }

    pub fn insert_commands(&mut self, commands: &[PathCommand], index: usize) -> Result<PathId> {
        let path = Path::from_commands(commands, &self.config)?;
        Ok(self.insert_path(path, index))
    }

    pub fn insert_path(&mut self, path: Path, index: usize) -> PathId {
        let id = self.register(path, index);
        self.notify(ChangeKind::Insert, Some(id));
        id
    }

    /// Assign an id, create visuals, no notification.
    pub(crate) fn register(&mut self, mut path: Path, index: usize) -> PathId {
        let id = PathId(self.next_id);
        self.next_id += 1;
        path.id = id;
        path.forget_visuals();
        let at = index.min(self.paths.len());
        self.paths.insert(at, path);
        self.sync(at);
        id
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.paths.len() {
            debug!(index, len = self.paths.len(), "remove out of range");
            return false;
        }
        let id = self.discard(index);
        self.notify(ChangeKind::Remove, Some(id));
        true
    }

    pub fn remove_path(&mut self, id: PathId) -> bool {
        match self.index_of(id) {
            Some(i) => self.remove(i),
            None => false,
        }
    }

    /// Drop a path and its visuals, no notification.
    pub(crate) fn discard(&mut self, index: usize) -> PathId {
        let path = self.paths.remove(index);
        release_visuals(&mut *self.host, &path);
        path.id
    }

    pub fn clear(&mut self) {
        for p in std::mem::take(&mut self.paths) {
            release_visuals(&mut *self.host, &p);
        }
        self.notify(ChangeKind::Clear, None);
    }

    /// Closed clockwise rectangle, appended and selected.
    pub fn create_rect_path(&mut self, left: f32, top: f32, right: f32, bottom: f32) -> PathId {
        let id = self.register(Path::rect(left, top, right, bottom), usize::MAX);
        self.notify(ChangeKind::Insert, Some(id));
        self.select(Some(id));
        id
    }

    /// Exclusive selection; `None` clears it.
    pub fn select(&mut self, id: Option<PathId>) -> bool {
        if let Some(id) = id {
            if self.index_of(id).is_none() {
                return false;
            }
        }
        for i in 0..self.paths.len() {
            let want = Some(self.paths[i].id) == id;
            if self.paths[i].selected != want {
                self.paths[i].selected = want;
                self.sync(i);
            }
        }
        self.notify(ChangeKind::Select, id);
        true
    }

    pub fn selected(&self) -> Option<PathId> {
        self.paths.iter().find(|p| p.selected).map(|p| p.id)
    }

    pub fn split_edge(&mut self, path: PathId, edge: EdgeId, point: Vec2) -> Option<VertexId> {
        let v = self.split_edge_quiet(path, edge, point)?;
        self.notify(ChangeKind::Transform, Some(path));
        Some(v)
    }

    pub(crate) fn split_edge_quiet(
        &mut self,
        path: PathId,
        edge: EdgeId,
        point: Vec2,
    ) -> Option<VertexId> {
        let i = self.index_of(path)?;
        let v = self.paths[i].split_edge(edge, point)?;
        self.sync(i);
        Some(v)
    }

    /// Delete a vertex; a path left without vertices is removed from the
    /// document.
    pub fn delete_vertex(&mut self, path: PathId, vertex: VertexId) -> DeleteOutcome {
        let outcome = self.delete_vertex_quiet(path, vertex);
        match outcome {
            DeleteOutcome::NotFound => {}
            DeleteOutcome::PathEmptied => self.notify(ChangeKind::Remove, Some(path)),
            _ => self.notify(ChangeKind::Transform, Some(path)),
        }
        outcome
    }

    fn delete_vertex_quiet(&mut self, path: PathId, vertex: VertexId) -> DeleteOutcome {
        let Some(i) = self.index_of(path) else {
            debug!(path = path.0, "delete_vertex on missing path");
            return DeleteOutcome::NotFound;
        };
        let outcome = self.paths[i].delete_vertex(vertex);
        match outcome {
            DeleteOutcome::NotFound => {}
            DeleteOutcome::PathEmptied => {
                self.discard(i);
            }
            _ => self.sync(i),
        }
        outcome
    }

    /// Fold a split vertex back into its incoming edge, no notification.
    pub(crate) fn unsplit_quiet(&mut self, path: PathId, vertex: VertexId, kind: EdgeKind) -> bool {
        let Some(i) = self.index_of(path) else {
            return false;
        };
        if !self.paths[i].unsplit(vertex, kind) {
            warn!(path = path.0, vertex = vertex.0, "split vertex could not be folded back");
            return false;
        }
        self.sync(i);
        true
    }

    pub fn set_control_point(
        &mut self,
        path: PathId,
        edge: EdgeId,
        end: HandleEnd,
        point: Vec2,
    ) -> bool {
        let Some(i) = self.index_of(path) else {
            return false;
        };
        if !self.paths[i].set_control_point(edge, end, point) {
            return false;
        }
        self.sync(i);
        self.notify(ChangeKind::Transform, Some(path));
        true
    }

    pub fn snapshot(&self, path: PathId) -> Option<Snapshot> {
        self.path(path).map(|p| p.snapshot())
    }

    pub fn snapshot_vertices(&self, path: PathId, ids: &[VertexId]) -> Option<Snapshot> {
        self.path(path)?.snapshot_vertices(ids)
    }

    /// Apply a transform for one frame of a drag. Visuals follow, but no
    /// change is queued until [`Document::finish_transform`].
    pub fn transform(&mut self, snap: &Snapshot, opts: &TransformOptions) -> Result<bool> {
        let Some(i) = self.index_of(snap.path()) else {
            debug!(path = snap.path().0, "transform on missing path");
            return Ok(false);
        };
        self.paths[i].apply_transform(snap, opts)?;
        self.sync(i);
        Ok(true)
    }

    /// Commit the transform in progress on `path`.
    pub fn finish_transform(&mut self, path: PathId) {
        if self.index_of(path).is_some() {
            self.notify(ChangeKind::Transform, Some(path));
        }
    }

    pub(crate) fn reshape_rect(&mut self, path: PathId, a: Vec2, b: Vec2) -> bool {
        let Some(i) = self.index_of(path) else {
            return false;
        };
        if !self.paths[i].reshape_rect(a, b) {
            warn!(path = path.0, "reshape on a path that is not a rectangle");
            return false;
        }
        self.sync(i);
        true
    }

    /// Push current geometry of path `index` to the host, creating visuals
    /// for new entities and releasing retired ones.
    fn sync(&mut self, index: usize) {
        let Document { paths, host, .. } = self;
        let Some(path) = paths.get_mut(index) else {
            return;
        };
        for h in path.retired.drain(..) {
            host.remove_visual(h);
        }
        let pid = path.id;

        let mut vparams = Vec::new();
        for v in path.vertex_ids() {
            if let Some(vx) = path.vertex(v) {
                vparams.push((
                    v,
                    VisualParams::Vertex {
                        entity: Entity::Vertex { path: pid, vertex: v },
                        pos: vx.pos,
                        smooth: vx.smooth,
                    },
                ));
            }
        }
        for (v, params) in vparams {
            if let Some(Some(vx)) = path.vertices.get_mut(v.idx()) {
                put(&mut **host, &mut vx.visual, VisualKind::Vertex, &params);
            }
        }

        let mut eparams = Vec::new();
        for e in path.edge_ids() {
            let Some(edge) = path.edge(e) else { continue };
            let (Some(a), Some(b)) = (path.vertex(edge.start), path.vertex(edge.end)) else {
                continue;
            };
            eparams.push((
                e,
                VisualParams::Edge {
                    entity: Entity::Edge { path: pid, edge: e },
                    from: a.pos,
                    to: b.pos,
                    curve: edge.kind,
                },
            ));
        }
        for (e, params) in eparams {
            if let Some(Some(ed)) = path.edges.get_mut(e.idx()) {
                put(&mut **host, &mut ed.visual, VisualKind::Edge, &params);
            }
        }

        let params = VisualParams::Path {
            entity: Entity::Path { path: pid },
            descriptor: path.to_descriptor(),
            bbox: path.bbox(),
            selected: path.selected,
        };
        put(&mut **host, &mut path.visual, VisualKind::Path, &params);
    }
}

fn put(
    host: &mut dyn RenderHost,
    slot: &mut Option<VisualHandle>,
    kind: VisualKind,
    params: &VisualParams,
) {
    match *slot {
        Some(h) => host.update_visual(h, params),
        None => *slot = Some(host.create_visual(kind, params)),
    }
}

fn release_visuals(host: &mut dyn RenderHost, path: &Path) {
    for h in path.retired.iter().copied() {
        host.remove_visual(h);
    }
    for v in path.vertices.iter().flatten() {
        if let Some(h) = v.visual() {
            host.remove_visual(h);
        }
    }
    for e in path.edges.iter().flatten() {
        if let Some(h) = e.visual() {
            host.remove_visual(h);
        }
    }
    if let Some(h) = path.visual {
        host.remove_visual(h);
    }
}
