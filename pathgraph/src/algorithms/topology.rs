//! Topology edits on a single path: split an edge, delete a vertex, and the
//! rectangle constructor.

use crate::model::{EdgeId, EdgeKind, Vec2, Vertex, VertexId};
use crate::path::Path;
use tracing::debug;

/// Result of [`Path::delete_vertex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Stale vertex or broken outgoing link; nothing changed.
    NotFound,
    /// Neighbors were re-linked around the removed vertex.
    Merged,
    /// The vertex's whole subpath went away.
    SubpathRemoved,
    /// The path has no vertices left.
    PathEmptied,
}

/// Re-express `kind`'s start-relative handle against a new start point,
/// keeping the absolute control point where it was.
fn rebase_start(kind: EdgeKind, old_start: Vec2, new_start: Vec2) -> EdgeKind {
    match kind {
        EdgeKind::Cubic { ha, hb } => EdgeKind::Cubic {
            ha: old_start + ha - new_start,
            hb,
        },
        other => other,
    }
}

impl Path {
    /// Closed clockwise rectangle TL, TR, BR, BL. Corners are sorted, so
    /// any two opposite corners work.
    pub fn rect(left: f32, top: f32, right: f32, bottom: f32) -> Path {
        let (l, r) = (left.min(right), left.max(right));
        let (t, b) = (top.min(bottom), top.max(bottom));
        let mut p = Path::empty();
        let corners = [Vec2::new(l, t), Vec2::new(r, t), Vec2::new(r, b), Vec2::new(l, b)];
        let ids: Vec<VertexId> = corners
            .iter()
            .enumerate()
            .map(|(i, &c)| p.push_vertex(c, Some(i as u32)))
            .collect();
        for i in 0..ids.len() {
            p.push_edge(ids[i], ids[(i + 1) % ids.len()], EdgeKind::Line);
        }
        p
    }

    /// Move the corners of a rectangle built by [`Path::rect`].
    pub(crate) fn reshape_rect(&mut self, a: Vec2, b: Vec2) -> bool {
        if self.vertex_count() != 4 {
            return false;
        }
        let (l, r) = (a.x.min(b.x), a.x.max(b.x));
        let (t, bt) = (a.y.min(b.y), a.y.max(b.y));
        let corners = [Vec2::new(l, t), Vec2::new(r, t), Vec2::new(r, bt), Vec2::new(l, bt)];
        let ids: Vec<VertexId> = self.vertex_ids().collect();
        ids.iter().zip(corners).all(|(&v, c)| self.move_vertex(v, c))
    }

    /// Insert a vertex at `point` on edge `e`. The original edge becomes a
    /// line from its start to the new vertex; a new trailing edge carries the
    /// original curve data to the original end. Curves are not subdivided.
    pub fn split_edge(&mut self, e: EdgeId, point: Vec2) -> Option<VertexId> {
        if !point.is_finite() {
            return None;
        }
        let Some(edge) = self.edge(e) else {
            debug!(edge = e.0, "split_edge on missing edge");
            return None;
        };
        let (start, far, kind) = (edge.start, edge.end, edge.kind);
        let start_pos = self.vertex(start)?.pos;

        let v = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex::new(point, None)));
        let at = self.order.iter().position(|&o| o == start).map_or(self.order.len(), |i| i + 1);
        self.order.insert(at, v);

        if let Some(Some(ed)) = self.edges.get_mut(e.idx()) {
            ed.end = v;
            ed.kind = EdgeKind::Line;
        }
        if let Some(Some(vx)) = self.vertices.get_mut(v.idx()) {
            vx.incoming = Some(e);
        }
        self.push_edge(v, far, rebase_start(kind, start_pos, point));
        Some(v)
    }

    /// Remove a vertex, re-linking its neighbors. The incoming edge takes
    /// over the outgoing edge's far end and curve data. A merge that leaves a
    /// one-vertex loop removes that loop too, so the descriptor of the result
    /// is always accepted by [`Path::parse_strict`].
    pub fn delete_vertex(&mut self, v: VertexId) -> DeleteOutcome {
        let Some(vx) = self.vertex(v) else {
            debug!(vertex = v.0, "delete_vertex on missing vertex");
            return DeleteOutcome::NotFound;
        };
        let (incoming, outgoing, pos) = (vx.incoming, vx.outgoing, vx.pos);
        if let Some(out) = outgoing {
            if self.edge(out).is_none() {
                debug!(vertex = v.0, edge = out.0, "outgoing edge missing, delete skipped");
                return DeleteOutcome::NotFound;
            }
        }

        let merged = match (incoming, outgoing) {
            (None, None) => {
                self.release_vertex(v);
                false
            }
            (Some(a), Some(b)) if a == b => {
                self.release_edge(a);
                self.release_vertex(v);
                false
            }
            // Head of an open subpath: its successor becomes the head
            (None, Some(b)) => {
                let next = self.edge(b).map(|ed| ed.end);
                self.release_edge(b);
                self.release_vertex(v);
                if let Some(Some(n)) = next.and_then(|n| self.vertices.get_mut(n.idx())) {
                    n.incoming = None;
                }
                true
            }
            // Tail of an open subpath
            (Some(a), None) => {
                let prev = self.edge(a).map(|ed| ed.start);
                self.release_edge(a);
                self.release_vertex(v);
                if let Some(Some(p)) = prev.and_then(|p| self.vertices.get_mut(p.idx())) {
                    p.outgoing = None;
                }
                true
            }
            (Some(a), Some(b)) => {
                let Some(out) = self.edge(b).cloned() else {
                    return DeleteOutcome::NotFound;
                };
                let Some(a_start) = self.edge(a).map(|ed| ed.start) else {
                    return DeleteOutcome::NotFound;
                };
                let Some(a_start_pos) = self.vertex(a_start).map(|s| s.pos) else {
                    return DeleteOutcome::NotFound;
                };
                if let Some(Some(ed)) = self.edges.get_mut(a.idx()) {
                    ed.end = out.end;
                    ed.kind = rebase_start(out.kind, pos, a_start_pos);
                }
                if let Some(Some(f)) = self.vertices.get_mut(out.end.idx()) {
                    f.incoming = Some(a);
                }
                self.release_edge(b);
                self.release_vertex(v);

                if out.end == a_start {
                    // A one-vertex loop is never kept, whatever its length
                    debug!(vertex = a_start.0, "merge collapsed a loop, subpath removed");
                    self.release_edge(a);
                    self.release_vertex(a_start);
                    return self.outcome_after_removal();
                }
                true
            }
        };
        if merged {
            DeleteOutcome::Merged
        } else {
            self.outcome_after_removal()
        }
    }

    /// Undo [`Path::split_edge`]: fold `v` back into its incoming edge and
    /// restore that edge's `kind`. Unlike a delete, the joined edge is kept
    /// even when it closes a loop on a single vertex.
    pub(crate) fn unsplit(&mut self, v: VertexId, kind: EdgeKind) -> bool {
        let Some(vx) = self.vertex(v) else {
            return false;
        };
        let (Some(a), Some(b)) = (vx.incoming, vx.outgoing) else {
            return false;
        };
        if a == b || self.edge(a).is_none() {
            return false;
        }
        let Some(far) = self.edge(b).map(|ed| ed.end) else {
            return false;
        };
        if let Some(Some(ed)) = self.edges.get_mut(a.idx()) {
            ed.end = far;
            ed.kind = kind;
        }
        if let Some(Some(f)) = self.vertices.get_mut(far.idx()) {
            f.incoming = Some(a);
        }
        self.release_edge(b);
        self.release_vertex(v);
        true
    }

    fn outcome_after_removal(&self) -> DeleteOutcome {
        if self.is_empty() {
            DeleteOutcome::PathEmptied
        } else {
            DeleteOutcome::SubpathRemoved
        }
    }
}
