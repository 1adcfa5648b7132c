//! Snapshot-based transforms.
//!
//! Every application starts again from the captured baseline, so a drag can
//! call [`Path::apply_transform`] once per pointer move without accumulating
//! rounding, and cancelling is just the identity transform.

use crate::error::{PathError, Result};
use crate::model::{ArcParams, Bounds, EdgeId, EdgeKind, PathId, Vec2, VertexId};
use crate::path::Path;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rotation {
    Degrees(f32),
    /// Precomputed sine and cosine of the angle.
    SinCos { sin: f32, cos: f32 },
}

impl Rotation {
    pub fn sin_cos(self) -> (f32, f32) {
        match self {
            Rotation::Degrees(d) => d.to_radians().sin_cos(),
            Rotation::SinCos { sin, cos } => (sin, cos),
        }
    }

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Degrees(d) => d,
            Rotation::SinCos { sin, cos } => sin.atan2(cos).to_degrees(),
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Rotation::Degrees(d) => d.is_finite(),
            Rotation::SinCos { sin, cos } => sin.is_finite() && cos.is_finite(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformOptions {
    /// Pivot for scale and rotation; the snapshot's bbox center when `None`.
    pub center: Option<Vec2>,
    pub offset: Vec2,
    pub scale_x: f32,
    /// Defaults to `scale_x`.
    pub scale_y: Option<f32>,
    pub rotation: Option<Rotation>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            center: None,
            offset: Vec2::ZERO,
            scale_x: 1.0,
            scale_y: None,
            rotation: None,
        }
    }
}

impl TransformOptions {
    pub fn translate(offset: Vec2) -> Self {
        TransformOptions {
            offset,
            ..Default::default()
        }
    }

    pub fn scale(k: f32) -> Self {
        TransformOptions {
            scale_x: k,
            ..Default::default()
        }
    }

    pub fn rotate(rotation: Rotation) -> Self {
        TransformOptions {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        let sy = self.scale_y.unwrap_or(self.scale_x);
        let no_turn = match self.rotation {
            None => true,
            Some(Rotation::Degrees(d)) => d == 0.0,
            Some(Rotation::SinCos { sin, cos }) => sin == 0.0 && cos == 1.0,
        };
        self.offset == Vec2::ZERO && self.scale_x == 1.0 && sy == 1.0 && no_turn
    }

    fn validate(&self) -> Result<()> {
        if !self.offset.is_finite() {
            return Err(PathError::NonFinite("offset"));
        }
        if self.center.is_some_and(|c| !c.is_finite()) {
            return Err(PathError::NonFinite("center"));
        }
        if !self.scale_x.is_finite() || self.scale_y.is_some_and(|s| !s.is_finite()) {
            return Err(PathError::NonFinite("scale"));
        }
        if self.rotation.is_some_and(|r| !r.is_finite()) {
            return Err(PathError::NonFinite("rotation"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotScope {
    /// Every vertex and edge of the path.
    Whole,
    /// A vertex, or an edge's endpoints; only translation applies.
    Vertices,
}

/// Read-only capture of pre-transform coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    path: PathId,
    scope: SnapshotScope,
    positions: Vec<(VertexId, Vec2)>,
    kinds: Vec<(EdgeId, EdgeKind)>,
    center: Vec2,
}

impl Snapshot {
    pub fn path(&self) -> PathId {
        self.path
    }

    pub fn scope(&self) -> SnapshotScope {
        self.scope
    }

    /// Bbox center at capture time.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.positions.iter().map(|(v, _)| *v)
    }

    /// Baseline position of a captured vertex.
    pub fn position(&self, v: VertexId) -> Option<Vec2> {
        self.positions.iter().find(|(id, _)| *id == v).map(|(_, p)| *p)
    }
}

impl Path {
    pub fn snapshot(&self) -> Snapshot {
        let positions = self
            .vertex_ids()
            .filter_map(|v| self.vertex(v).map(|vx| (v, vx.pos)))
            .collect();
        let kinds = self
            .edge_ids()
            .filter_map(|e| self.edge(e).map(|ed| (e, ed.kind)))
            .collect();
        Snapshot {
            path: self.id,
            scope: SnapshotScope::Whole,
            positions,
            kinds,
            center: self.bbox().map_or(Vec2::ZERO, |r| r.center()),
        }
    }

    /// Snapshot for single-vertex mode. Missing ids are skipped; `None` if
    /// none of them exist.
    pub fn snapshot_vertices(&self, ids: &[VertexId]) -> Option<Snapshot> {
        let mut positions: Vec<(VertexId, Vec2)> = Vec::with_capacity(ids.len());
        let mut b = Bounds::empty();
        for &v in ids {
            if positions.iter().any(|(id, _)| *id == v) {
                continue;
            }
            if let Some(vx) = self.vertex(v) {
                positions.push((v, vx.pos));
                b.include(vx.pos);
            }
        }
        let center = b.to_rect()?.center();
        Some(Snapshot {
            path: self.id,
            scope: SnapshotScope::Vertices,
            positions,
            kinds: Vec::new(),
            center,
        })
    }

    /// Snapshot of an edge's two endpoints (one for a self-loop).
    pub fn snapshot_edge(&self, e: EdgeId) -> Option<Snapshot> {
        let edge = self.edge(e)?;
        self.snapshot_vertices(&[edge.start, edge.end])
    }

    /// Apply `opts` on top of `snap`'s baseline. Returns the number of
    /// vertices written. Entities created after the snapshot are left alone
    /// and entities deleted since are skipped.
    pub fn apply_transform(&mut self, snap: &Snapshot, opts: &TransformOptions) -> Result<usize> {
        opts.validate()?;
        if snap.path != self.id {
            debug!(
                snapshot = snap.path.0,
                path = self.id.0,
                "snapshot belongs to another path"
            );
            return Ok(0);
        }
        let identity = opts.is_identity();
        let mut written = 0;
        match snap.scope {
            SnapshotScope::Vertices => {
                for &(v, p) in &snap.positions {
                    let to = if identity { p } else { p + opts.offset };
                    if self.move_vertex(v, to) {
                        written += 1;
                    }
                }
            }
            SnapshotScope::Whole => {
                let (sin, cos) = opts.rotation.map_or((0.0, 1.0), |r| r.sin_cos());
                let sx = opts.scale_x;
                let sy = opts.scale_y.unwrap_or(sx);
                let lin = |v: Vec2| {
                    Vec2::new(
                        cos * sx * v.x - sin * sx * v.y,
                        sin * sy * v.x + cos * sy * v.y,
                    )
                };
                let c = opts.center.unwrap_or(snap.center);
                let turn = opts.rotation.map_or(0.0, |r| r.degrees());
                for &(v, p) in &snap.positions {
                    let to = if identity { p } else { c + lin(p - c) + opts.offset };
                    if self.move_vertex(v, to) {
                        written += 1;
                    }
                }
                for &(e, kind) in &snap.kinds {
                    let Some(Some(edge)) = self.edges.get_mut(e.idx()) else {
                        continue;
                    };
                    edge.kind = if identity {
                        kind
                    } else {
                        match kind {
                            EdgeKind::Line => EdgeKind::Line,
                            EdgeKind::Cubic { ha, hb } => EdgeKind::Cubic {
                                ha: lin(ha),
                                hb: lin(hb),
                            },
                            EdgeKind::Arc(a) => EdgeKind::Arc(ArcParams {
                                rx: a.rx * sx.abs(),
                                ry: a.ry * sx.abs(),
                                rotation: a.rotation + turn,
                                ..a
                            }),
                        }
                    };
                }
            }
        }
        trace!(path = self.id.0, written, "transform applied");
        Ok(written)
    }
}
