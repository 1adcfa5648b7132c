//! Path graph: vertices and directed edges in per-path arenas.
//!
//! Ids are arena indices. Once a path is built its ids are never reused, so
//! a stale `VertexId`/`EdgeId` simply resolves to nothing.

use crate::algorithms::normalize::{normalize, Normalized};
use crate::config::EditorConfig;
use crate::error::{PathError, Result};
use crate::geometry::arc::CenterArc;
use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::EPS_LEN;
use crate::host::VisualHandle;
use crate::model::{
    format_segments, Bounds, Edge, EdgeId, EdgeKind, PathCommand, PathId, Rect, Segment, Vec2,
    Vertex, VertexId,
};
use crate::svg::parse_descriptor;
use tracing::{debug, warn};

/// Which control point of a cubic edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleEnd {
    /// Control point attached to the edge's start vertex.
    Start,
    /// Control point attached to the edge's end vertex.
    End,
}

/// One connected run of vertices, in drawing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subpath {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub closed: bool,
}

#[derive(Clone, Debug)]
pub struct Path {
    pub(crate) id: PathId,
    pub(crate) selected: bool,
    pub(crate) vertices: Vec<Option<Vertex>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>,      // id is index
    // Live vertices in drawing order; each subpath is a contiguous run
    // starting at its initial vertex.
    pub(crate) order: Vec<VertexId>,
    pub(crate) visual: Option<VisualHandle>,
    // Visuals of released entities, drained by the owning document.
    pub(crate) retired: Vec<VisualHandle>,
}

impl Path {
    pub(crate) fn empty() -> Self {
        Path {
            id: PathId(0),
            selected: false,
            vertices: Vec::new(),
            edges: Vec::new(),
            order: Vec::new(),
            visual: None,
            retired: Vec::new(),
        }
    }

    /// Parse a descriptor; `None` if no valid path results.
    pub fn parse(d: &str, cfg: &EditorConfig) -> Option<Path> {
        Self::parse_strict(d, cfg).ok()
    }

    pub fn parse_strict(d: &str, cfg: &EditorConfig) -> Result<Path> {
        parse_descriptor(d, cfg)
            .and_then(|cmds| normalize(&cmds, cfg))
            .and_then(|n| Self::from_normalized(&n, cfg))
            .inspect_err(|e| warn!(code = e.code(), "descriptor rejected: {}", e))
    }

    pub fn from_commands(commands: &[PathCommand], cfg: &EditorConfig) -> Result<Path> {
        normalize(commands, cfg)
            .and_then(|n| Self::from_normalized(&n, cfg))
            .inspect_err(|e| warn!(code = e.code(), "command list rejected: {}", e))
    }

    /// Build the graph from canonical segments and validate it.
    pub fn from_normalized(n: &Normalized, cfg: &EditorConfig) -> Result<Path> {
        let mut p = Path::empty();
        let mut head: Option<VertexId> = None;
        let mut last: Option<VertexId> = None;
        for (i, seg) in n.segments.iter().enumerate() {
            let cmd = Some(i as u32);
            match *seg {
                Segment::MoveTo(at) => {
                    let v = p.push_vertex(at, cmd);
                    head = Some(v);
                    last = Some(v);
                    continue;
                }
                Segment::Close => {
                    if let (Some(h), Some(l)) = (head, last) {
                        if h != l {
                            p.seal(h, l);
                        }
                    }
                    head = None;
                    last = None;
                    continue;
                }
                _ => {}
            }
            let Some(from) = last else {
                debug!("segment {} has no start point, skipped", i);
                continue;
            };
            let from_pos = p.vertex(from).map_or(Vec2::ZERO, |v| v.pos);
            let (kind, to) = match *seg {
                Segment::LineTo(to) => (EdgeKind::Line, to),
                Segment::CubicTo { c1, c2, to } => (
                    EdgeKind::Cubic {
                        ha: c1 - from_pos,
                        hb: c2 - to,
                    },
                    to,
                ),
                Segment::ArcTo { arc, to } => (EdgeKind::Arc(arc), to),
                Segment::MoveTo(_) | Segment::Close => continue,
            };
            if n.smooth.get(i).copied().unwrap_or(false) {
                if let Some(Some(vx)) = p.vertices.get_mut(from.idx()) {
                    vx.smooth = true;
                }
            }
            last = Some(p.draw_to(from, kind, to, cmd));
        }
        p.validate(cfg)?;
        Ok(p)
    }

    fn validate(&self, cfg: &EditorConfig) -> Result<()> {
        if self.vertex_count() == 0 {
            return Err(PathError::EmptyDescriptor);
        }
        for (i, sp) in self.subpaths().iter().enumerate() {
            if sp.vertices.len() > 1 {
                continue;
            }
            let length: f32 = sp
                .edges
                .iter()
                .filter_map(|&e| self.edge_length(e, cfg.arc_length_tolerance))
                .sum();
            if length > cfg.degenerate_length {
                return Err(PathError::DegenerateSubpath {
                    subpath: i,
                    vertices: sp.vertices.len(),
                    length,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn push_vertex(&mut self, pos: Vec2, command: Option<u32>) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Some(Vertex::new(pos, command)));
        self.order.push(id);
        id
    }

    pub(crate) fn push_edge(&mut self, start: VertexId, end: VertexId, kind: EdgeKind) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(Edge {
            start,
            end,
            kind,
            visual: None,
        }));
        if let Some(Some(v)) = self.vertices.get_mut(start.idx()) {
            v.outgoing = Some(id);
        }
        if let Some(Some(v)) = self.vertices.get_mut(end.idx()) {
            v.incoming = Some(id);
        }
        id
    }

    fn draw_to(&mut self, from: VertexId, kind: EdgeKind, to: Vec2, cmd: Option<u32>) -> VertexId {
        let v = self.push_vertex(to, cmd);
        self.push_edge(from, v, kind);
        v
    }

    /// Close a subpath: the trailing edge now ends on `head` and the
    /// duplicate trailing vertex goes away. `last` is always the newest vertex.
    fn seal(&mut self, head: VertexId, last: VertexId) {
        debug_assert_eq!(last.idx() + 1, self.vertices.len());
        let Some(e) = self.vertex(last).and_then(|v| v.incoming) else {
            return;
        };
        if let Some(Some(edge)) = self.edges.get_mut(e.idx()) {
            edge.end = head;
        }
        if let Some(Some(v)) = self.vertices.get_mut(head.idx()) {
            v.incoming = Some(e);
        }
        self.vertices.pop();
        self.order.pop();
    }

    pub(crate) fn release_vertex(&mut self, v: VertexId) {
        if let Some(slot) = self.vertices.get_mut(v.idx()) {
            if let Some(vx) = slot.take() {
                self.retired.extend(vx.visual);
            }
        }
        self.order.retain(|&o| o != v);
    }

    pub(crate) fn release_edge(&mut self, e: EdgeId) {
        if let Some(slot) = self.edges.get_mut(e.idx()) {
            if let Some(edge) = slot.take() {
                self.retired.extend(edge.visual);
            }
        }
    }

    /// Drop handle bookkeeping, e.g. for a path cloned out of another document.
    pub(crate) fn forget_visuals(&mut self) {
        self.visual = None;
        self.retired.clear();
        for v in self.vertices.iter_mut().flatten() {
            v.visual = None;
        }
        for e in self.edges.iter_mut().flatten() {
            e.visual = None;
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.idx()).and_then(|v| v.as_ref())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.idx()).and_then(|e| e.as_ref())
    }

    pub fn vertex_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Live vertex ids in drawing order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.order.iter().copied()
    }

    /// Live edge ids in creation order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| EdgeId(i as u32)))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn subpaths(&self) -> Vec<Subpath> {
        let mut seen = vec![false; self.vertices.len()];
        let mut out = Vec::new();
        for &head in &self.order {
            if seen[head.idx()] {
                continue;
            }
            let mut sp = Subpath::default();
            let mut v = head;
            loop {
                seen[v.idx()] = true;
                sp.vertices.push(v);
                let Some(e) = self.vertex(v).and_then(|vx| vx.outgoing) else {
                    break;
                };
                sp.edges.push(e);
                let Some(edge) = self.edge(e) else { break };
                if edge.end == head {
                    sp.closed = true;
                    break;
                }
                if seen[edge.end.idx()] {
                    break;
                }
                v = edge.end;
            }
            out.push(sp);
        }
        out
    }

    /// Absolute control points of a cubic edge.
    pub fn cubic(&self, e: EdgeId) -> Option<CubicBezier> {
        let edge = self.edge(e)?;
        let a = self.vertex(edge.start)?.pos;
        let b = self.vertex(edge.end)?.pos;
        match edge.kind {
            EdgeKind::Cubic { ha, hb } => Some(CubicBezier::new(a, a + ha, b + hb, b)),
            _ => None,
        }
    }

    fn edge_ends(&self, edge: &Edge) -> Option<(Vec2, Vec2)> {
        Some((self.vertex(edge.start)?.pos, self.vertex(edge.end)?.pos))
    }

    /// Point at parameter `t` ∈ [0, 1] along an edge.
    pub fn point_at(&self, e: EdgeId, t: f32) -> Option<Vec2> {
        let edge = self.edge(e)?;
        let (a, b) = self.edge_ends(edge)?;
        Some(match edge.kind {
            EdgeKind::Line => a.lerp(b, t),
            EdgeKind::Cubic { ha, hb } => CubicBezier::new(a, a + ha, b + hb, b).eval(t),
            EdgeKind::Arc(arc) => match CenterArc::from_endpoints(a, &arc, b) {
                Some(c) => c.eval(t),
                None => a.lerp(b, t),
            },
        })
    }

    pub fn edge_length(&self, e: EdgeId, tolerance: f32) -> Option<f32> {
        let edge = self.edge(e)?;
        let (a, b) = self.edge_ends(edge)?;
        Some(match edge.kind {
            EdgeKind::Line => a.distance(b),
            EdgeKind::Cubic { ha, hb } => CubicBezier::new(a, a + ha, b + hb, b).arc_length(tolerance),
            EdgeKind::Arc(arc) => match CenterArc::from_endpoints(a, &arc, b) {
                Some(c) => c.length(tolerance),
                None => a.distance(b),
            },
        })
    }

    pub(crate) fn edge_bounds_raw(&self, edge: &Edge) -> Option<Bounds> {
        let (a, b) = self.edge_ends(edge)?;
        Some(match edge.kind {
            EdgeKind::Line => {
                let mut bb = Bounds::empty();
                bb.include(a);
                bb.include(b);
                bb
            }
            EdgeKind::Cubic { ha, hb } => CubicBezier::new(a, a + ha, b + hb, b).bounds(),
            EdgeKind::Arc(arc) => match CenterArc::from_endpoints(a, &arc, b) {
                Some(c) => c.bounds(a, b),
                None => {
                    let mut bb = Bounds::empty();
                    bb.include(a);
                    bb.include(b);
                    bb
                }
            },
        })
    }

    /// Tight bounds of one edge (curve extrema included).
    pub fn edge_bounds(&self, e: EdgeId) -> Option<Rect> {
        self.edge_bounds_raw(self.edge(e)?)?.to_rect()
    }

    /// Tight bounding box of the whole path; `None` when empty.
    pub fn bbox(&self) -> Option<Rect> {
        let mut b = Bounds::empty();
        for v in self.vertices.iter().flatten() {
            b.include(v.pos);
        }
        for e in self.edges.iter().flatten() {
            if let Some(eb) = self.edge_bounds_raw(e) {
                b.union(&eb);
            }
        }
        b.to_rect()
    }

    /// Canonical segments regenerated from the live graph.
    pub fn to_segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        for sp in self.subpaths() {
            let Some(head) = sp.vertices.first().and_then(|&v| self.vertex(v)) else {
                continue;
            };
            out.push(Segment::MoveTo(head.pos));
            for &e in &sp.edges {
                let Some(edge) = self.edge(e) else { continue };
                let Some((a, b)) = self.edge_ends(edge) else {
                    continue;
                };
                out.push(match edge.kind {
                    EdgeKind::Line => Segment::LineTo(b),
                    EdgeKind::Cubic { ha, hb } => Segment::CubicTo {
                        c1: a + ha,
                        c2: b + hb,
                        to: b,
                    },
                    EdgeKind::Arc(arc) => Segment::ArcTo { arc, to: b },
                });
            }
            if sp.closed {
                out.push(Segment::Close);
            }
        }
        out
    }

    pub fn to_descriptor(&self) -> String {
        format_segments(&self.to_segments())
    }

    /// Move one anchor. Relative handles follow it.
    pub fn move_vertex(&mut self, v: VertexId, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return false;
        }
        match self.vertices.get_mut(v.idx()) {
            Some(Some(vx)) => {
                vx.pos = pos;
                true
            }
            _ => false,
        }
    }

    pub fn set_smooth(&mut self, v: VertexId, smooth: bool) -> bool {
        match self.vertices.get_mut(v.idx()) {
            Some(Some(vx)) => {
                vx.smooth = smooth;
                true
            }
            _ => false,
        }
    }

    /// Move one control point of a cubic edge to absolute `point`. When the
    /// anchor it hangs off is smooth, the control point on the other side of
    /// that anchor is turned to stay collinear, keeping its own length.
    pub fn set_control_point(&mut self, e: EdgeId, end: HandleEnd, point: Vec2) -> bool {
        if !point.is_finite() {
            return false;
        }
        let Some(edge) = self.edge(e) else {
            debug!(edge = e.0, "set_control_point on missing edge");
            return false;
        };
        let EdgeKind::Cubic { mut ha, mut hb } = edge.kind else {
            return false;
        };
        let anchor = match end {
            HandleEnd::Start => edge.start,
            HandleEnd::End => edge.end,
        };
        let Some(av) = self.vertex(anchor) else {
            return false;
        };
        let (apos, smooth) = (av.pos, av.smooth);
        let (moved, opposite) = match end {
            HandleEnd::Start => {
                ha = point - apos;
                (ha, av.incoming)
            }
            HandleEnd::End => {
                hb = point - apos;
                (hb, av.outgoing)
            }
        };
        if let Some(Some(ed)) = self.edges.get_mut(e.idx()) {
            ed.kind = EdgeKind::Cubic { ha, hb };
        }
        let len = moved.length();
        if smooth && len > EPS_LEN {
            if let Some(oe) = opposite {
                let dir = -moved * (1.0 / len);
                if let Some(Some(ed)) = self.edges.get_mut(oe.idx()) {
                    if let EdgeKind::Cubic { ha: oha, hb: ohb } = ed.kind {
                        ed.kind = match end {
                            HandleEnd::Start => EdgeKind::Cubic {
                                ha: oha,
                                hb: dir * ohb.length(),
                            },
                            HandleEnd::End => EdgeKind::Cubic {
                                ha: dir * oha.length(),
                                hb: ohb,
                            },
                        };
                    }
                }
            }
        }
        true
    }

    /// Verify the linkage and cardinality invariants.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (i, slot) in self.edges.iter().enumerate() {
            let Some(e) = slot else { continue };
            let id = EdgeId(i as u32);
            let s = self
                .vertex(e.start)
                .ok_or_else(|| format!("edge {} start {} missing", i, e.start.0))?;
            let t = self
                .vertex(e.end)
                .ok_or_else(|| format!("edge {} end {} missing", i, e.end.0))?;
            if s.outgoing != Some(id) {
                return Err(format!("edge {} not outgoing of its start", i));
            }
            if t.incoming != Some(id) {
                return Err(format!("edge {} not incoming of its end", i));
            }
        }
        let mut live = 0;
        for (i, slot) in self.vertices.iter().enumerate() {
            let Some(v) = slot else { continue };
            live += 1;
            if !self.order.contains(&VertexId(i as u32)) {
                return Err(format!("vertex {} missing from order", i));
            }
            for (name, link) in [("incoming", v.incoming), ("outgoing", v.outgoing)] {
                if let Some(e) = link {
                    if self.edge(e).is_none() {
                        return Err(format!("vertex {} {} edge {} missing", i, name, e.0));
                    }
                }
            }
        }
        if live != self.order.len() {
            return Err(format!("order holds {} ids for {} vertices", self.order.len(), live));
        }
        let mut counted_v = 0;
        let mut counted_e = 0;
        for sp in self.subpaths() {
            counted_v += sp.vertices.len();
            counted_e += sp.edges.len();
            let expect = if sp.closed { sp.vertices.len() } else { sp.vertices.len() - 1 };
            if sp.edges.len() != expect {
                return Err(format!(
                    "subpath at {} has {} vertices, {} edges, closed={}",
                    sp.vertices[0].0,
                    sp.vertices.len(),
                    sp.edges.len(),
                    sp.closed
                ));
            }
            if !sp.closed && self.vertex(sp.vertices[0]).and_then(|v| v.incoming).is_some() {
                return Err(format!("open subpath head {} has an incoming edge", sp.vertices[0].0));
            }
        }
        if counted_v != live || counted_e != self.edge_count() {
            return Err("subpaths do not cover the graph".into());
        }
        Ok(())
    }
}
