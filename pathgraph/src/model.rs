use crate::host::VisualHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }
    #[inline]
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}
impl AddAssign for Vec2 {
    fn add_assign(&mut self, o: Vec2) {
        self.x += o.x;
        self.y += o.y;
    }
}
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}
impl SubAssign for Vec2 {
    fn sub_assign(&mut self, o: Vec2) {
        self.x -= o.x;
        self.y -= o.y;
    }
}
impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}
impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle in `{x, y, width, height}` form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_bounds(minx: f32, miny: f32, maxx: f32, maxy: f32) -> Self {
        Rect {
            x: minx,
            y: miny,
            width: maxx - minx,
            height: maxy - miny,
        }
    }
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// Running min/max accumulator used by every bbox computation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bounds {
    pub minx: f32,
    pub miny: f32,
    pub maxx: f32,
    pub maxy: f32,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds {
            minx: f32::INFINITY,
            miny: f32::INFINITY,
            maxx: f32::NEG_INFINITY,
            maxy: f32::NEG_INFINITY,
        }
    }
    pub fn include(&mut self, p: Vec2) {
        self.minx = self.minx.min(p.x);
        self.miny = self.miny.min(p.y);
        self.maxx = self.maxx.max(p.x);
        self.maxy = self.maxy.max(p.y);
    }
    pub fn union(&mut self, o: &Bounds) {
        self.minx = self.minx.min(o.minx);
        self.miny = self.miny.min(o.miny);
        self.maxx = self.maxx.max(o.maxx);
        self.maxy = self.maxy.max(o.maxy);
    }
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx
    }
    pub fn to_rect(self) -> Option<Rect> {
        if self.is_empty() {
            None
        } else {
            Some(Rect::from_bounds(self.minx, self.miny, self.maxx, self.maxy))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl VertexId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}
impl EdgeId {
    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Anything an input event can land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Root,
    Path { path: PathId },
    Vertex { path: PathId, vertex: VertexId },
    Edge { path: PathId, edge: EdgeId },
}

impl Entity {
    pub fn path(&self) -> Option<PathId> {
        match *self {
            Entity::Root => None,
            Entity::Path { path } | Entity::Vertex { path, .. } | Entity::Edge { path, .. } => {
                Some(path)
            }
        }
    }
}

/// Elliptical arc parameters; `rotation` is in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcParams {
    pub rx: f32,
    pub ry: f32,
    pub rotation: f32,
    pub large_arc: bool,
    pub sweep: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EdgeKind {
    Line,
    /// Handles are stored relative to their own endpoint: `ha` to the start
    /// vertex, `hb` to the end vertex.
    Cubic { ha: Vec2, hb: Vec2 },
    Arc(ArcParams),
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Vec2,
    pub smooth: bool,
    /// Index of the normalized segment that introduced this anchor.
    pub command: Option<u32>,
    pub incoming: Option<EdgeId>,
    pub outgoing: Option<EdgeId>,
    pub(crate) visual: Option<VisualHandle>,
}

impl Vertex {
    pub(crate) fn new(pos: Vec2, command: Option<u32>) -> Self {
        Vertex {
            pos,
            smooth: false,
            command,
            incoming: None,
            outgoing: None,
            visual: None,
        }
    }
    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub start: VertexId,
    pub end: VertexId,
    pub kind: EdgeKind,
    pub(crate) visual: Option<VisualHandle>,
}

impl Edge {
    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }
}

/// One raw command of the descriptor grammar. `rel` marks the lowercase form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo { rel: bool, to: Vec2 },
    LineTo { rel: bool, to: Vec2 },
    Horizontal { rel: bool, x: f32 },
    Vertical { rel: bool, y: f32 },
    CubicTo { rel: bool, c1: Vec2, c2: Vec2, to: Vec2 },
    SmoothCubicTo { rel: bool, c2: Vec2, to: Vec2 },
    QuadTo { rel: bool, q: Vec2, to: Vec2 },
    SmoothQuadTo { rel: bool, to: Vec2 },
    ArcTo { rel: bool, arc: ArcParams, to: Vec2 },
    Close,
    Unknown(char),
}

/// Canonical absolute segment produced by normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
    ArcTo { arc: ArcParams, to: Vec2 },
    Close,
}

impl Segment {
    pub fn end_point(&self) -> Option<Vec2> {
        match *self {
            Segment::MoveTo(p) | Segment::LineTo(p) => Some(p),
            Segment::CubicTo { to, .. } | Segment::ArcTo { to, .. } => Some(to),
            Segment::Close => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Segment::MoveTo(p) => write!(f, "M {} {}", p.x, p.y),
            Segment::LineTo(p) => write!(f, "L {} {}", p.x, p.y),
            Segment::CubicTo { c1, c2, to } => write!(
                f,
                "C {} {} {} {} {} {}",
                c1.x, c1.y, c2.x, c2.y, to.x, to.y
            ),
            Segment::ArcTo { arc, to } => write!(
                f,
                "A {} {} {} {} {} {} {}",
                arc.rx,
                arc.ry,
                arc.rotation,
                arc.large_arc as u8,
                arc.sweep as u8,
                to.x,
                to.y
            ),
            Segment::Close => f.write_str("Z"),
        }
    }
}

/// Joins segments into a descriptor string.
pub fn format_segments(segments: &[Segment]) -> String {
    let mut d = String::new();
    for (i, s) in segments.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&s.to_string());
    }
    d
}
