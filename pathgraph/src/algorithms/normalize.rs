//! Canonicalization of raw path commands.
//!
//! Output uses only absolute `M`, `L`, `C`, `A` and `Z`. Every subpath
//! starts with an explicit `M`; every `Z` is preceded by a drawing segment
//! that ends on the subpath's initial point, so feeding the output back in
//! yields the same sequence.

use crate::config::EditorConfig;
use crate::error::{PathError, Result};
use crate::geometry::cubic::CubicBezier;
use crate::geometry::tolerance::{same_point, EPS_LEN};
use crate::model::{format_segments, PathCommand, Segment, Vec2};
use crate::svg::parse_descriptor;
use tracing::debug;

/// Canonical segments plus per-segment smoothness.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    pub segments: Vec<Segment>,
    /// Parallel to `segments`: the segment's start anchor had its leading
    /// control point reflected from the previous curve (S/T continuation).
    pub smooth: Vec<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SubState {
    /// No moveto yet, or the last subpath was closed.
    None,
    /// A moveto with nothing drawn after it.
    Empty,
    Open,
}

#[derive(Clone, Copy, Debug)]
enum Prev {
    Cubic(Vec2),
    Quad(Vec2),
    Other,
}

struct Normalizer<'a> {
    cfg: &'a EditorConfig,
    out: Normalized,
    cur: Vec2,
    start: Vec2,
    sub: SubState,
    prev: Prev,
    subpaths: usize,
}

impl<'a> Normalizer<'a> {
    fn push(&mut self, seg: Segment, smooth: bool) -> Result<()> {
        if self.out.segments.len() >= self.cfg.max_segments {
            return Err(PathError::LimitExceeded {
                what: "segments",
                limit: self.cfg.max_segments,
            });
        }
        self.out.segments.push(seg);
        self.out.smooth.push(smooth);
        Ok(())
    }

    fn begin_subpath(&mut self, p: Vec2) -> Result<()> {
        self.subpaths += 1;
        if self.subpaths > self.cfg.max_subpaths {
            return Err(PathError::LimitExceeded {
                what: "subpaths",
                limit: self.cfg.max_subpaths,
            });
        }
        self.push(Segment::MoveTo(p), false)?;
        self.start = p;
        self.cur = p;
        self.sub = SubState::Empty;
        Ok(())
    }

    /// Seal the open subpath, drawing back to its initial point if needed.
    fn close(&mut self) -> Result<()> {
        debug_assert_eq!(self.sub, SubState::Open);
        let eps = self.cfg.close_epsilon;
        if !same_point(self.cur.x, self.cur.y, self.start.x, self.start.y, eps) {
            self.push(Segment::LineTo(self.start), false)?;
        }
        self.push(Segment::Close, false)?;
        self.cur = self.start;
        self.sub = SubState::None;
        Ok(())
    }

    fn draw(&mut self, seg: Segment, smooth: bool) -> Result<()> {
        if self.sub == SubState::None {
            // Drawing without a moveto starts at the current point
            let at = self.cur;
            self.begin_subpath(at)?;
        }
        let end = seg.end_point().unwrap_or(self.cur);
        self.push(seg, smooth)?;
        self.cur = end;
        self.sub = SubState::Open;
        Ok(())
    }

    fn command(&mut self, cmd: &PathCommand) -> Result<()> {
        let cur = self.cur;
        let abs = |rel: bool, p: Vec2| if rel { cur + p } else { p };
        match *cmd {
            PathCommand::MoveTo { rel, to } => {
                let p = abs(rel, to);
                match self.sub {
                    SubState::Open => {
                        self.close()?;
                        self.begin_subpath(p)?;
                    }
                    SubState::Empty => {
                        // Consecutive movetos collapse to the later one
                        if let Some(Segment::MoveTo(m)) = self.out.segments.last_mut() {
                            *m = p;
                        }
                        self.start = p;
                        self.cur = p;
                    }
                    SubState::None => self.begin_subpath(p)?,
                }
                self.prev = Prev::Other;
            }
            PathCommand::LineTo { rel, to } => {
                self.draw(Segment::LineTo(abs(rel, to)), false)?;
                self.prev = Prev::Other;
            }
            PathCommand::Horizontal { rel, x } => {
                let x = if rel { cur.x + x } else { x };
                self.draw(Segment::LineTo(Vec2::new(x, cur.y)), false)?;
                self.prev = Prev::Other;
            }
            PathCommand::Vertical { rel, y } => {
                let y = if rel { cur.y + y } else { y };
                self.draw(Segment::LineTo(Vec2::new(cur.x, y)), false)?;
                self.prev = Prev::Other;
            }
            PathCommand::CubicTo { rel, c1, c2, to } => {
                let (c1, c2, to) = (abs(rel, c1), abs(rel, c2), abs(rel, to));
                self.draw(Segment::CubicTo { c1, c2, to }, false)?;
                self.prev = Prev::Cubic(c2);
            }
            PathCommand::SmoothCubicTo { rel, c2, to } => {
                let (c2, to) = (abs(rel, c2), abs(rel, to));
                let (c1, smooth) = match self.prev {
                    Prev::Cubic(last) => (cur * 2.0 - last, true),
                    _ => (cur, false),
                };
                self.draw(Segment::CubicTo { c1, c2, to }, smooth)?;
                self.prev = Prev::Cubic(c2);
            }
            PathCommand::QuadTo { rel, q, to } => {
                let (q, to) = (abs(rel, q), abs(rel, to));
                let c = CubicBezier::from_quadratic(cur, q, to);
                self.draw(Segment::CubicTo { c1: c.p1, c2: c.p2, to }, false)?;
                self.prev = Prev::Quad(q);
            }
            PathCommand::SmoothQuadTo { rel, to } => {
                let to = abs(rel, to);
                let (q, smooth) = match self.prev {
                    Prev::Quad(last) => (cur * 2.0 - last, true),
                    _ => (cur, false),
                };
                let c = CubicBezier::from_quadratic(cur, q, to);
                self.draw(Segment::CubicTo { c1: c.p1, c2: c.p2, to }, smooth)?;
                self.prev = Prev::Quad(q);
            }
            PathCommand::ArcTo { rel, arc, to } => {
                let to = abs(rel, to);
                let (rx, ry) = (arc.rx.abs(), arc.ry.abs());
                if rx <= EPS_LEN || ry <= EPS_LEN {
                    self.draw(Segment::LineTo(to), false)?;
                } else {
                    let mut arc = arc;
                    arc.rx = rx;
                    arc.ry = ry;
                    self.draw(Segment::ArcTo { arc, to }, false)?;
                }
                self.prev = Prev::Other;
            }
            PathCommand::Close => {
                if self.sub == SubState::Open {
                    self.close()?;
                } else {
                    debug!("duplicate closepath dropped");
                }
                self.prev = Prev::Other;
            }
            PathCommand::Unknown(c) => {
                debug!("unrecognized command '{}' dropped", c);
            }
        }
        Ok(())
    }
}

/// Normalize a raw command sequence.
pub fn normalize(commands: &[PathCommand], cfg: &EditorConfig) -> Result<Normalized> {
    let mut n = Normalizer {
        cfg,
        out: Normalized::default(),
        cur: Vec2::ZERO,
        start: Vec2::ZERO,
        sub: SubState::None,
        prev: Prev::Other,
        subpaths: 0,
    };
    for cmd in commands {
        n.command(cmd)?;
    }
    Ok(n.out)
}

/// Parse and normalize a descriptor, returning the canonical descriptor text.
pub fn normalize_descriptor(d: &str, cfg: &EditorConfig) -> Result<String> {
    let commands = parse_descriptor(d, cfg)?;
    let n = normalize(&commands, cfg)?;
    Ok(format_segments(&n.segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(d: &str) -> String {
        normalize_descriptor(d, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn relative_commands_become_absolute() {
        assert_eq!(canon("m 10 10 l 5 0 h 5 v 5 z"), "M 10 10 L 15 10 L 20 10 L 20 15 L 10 10 Z");
    }

    #[test]
    fn closepath_skips_redundant_line() {
        assert_eq!(canon("M 0 0 L 10 0 L 0 0 Z"), "M 0 0 L 10 0 L 0 0 Z");
    }

    #[test]
    fn moveto_closes_open_subpath() {
        assert_eq!(
            canon("M 0 0 L 10 0 M 20 20 L 30 30"),
            "M 0 0 L 10 0 L 0 0 Z M 20 20 L 30 30"
        );
    }

    #[test]
    fn consecutive_movetos_collapse() {
        assert_eq!(canon("M 1 1 M 2 2 L 3 3"), "M 2 2 L 3 3");
    }

    #[test]
    fn drawing_without_moveto_synthesizes_one() {
        assert_eq!(canon("L 5 5"), "M 0 0 L 5 5");
        assert_eq!(canon("M 1 1 L 2 1 Z L 4 4"), "M 1 1 L 2 1 L 1 1 Z M 1 1 L 4 4");
    }

    #[test]
    fn duplicate_close_dropped() {
        assert_eq!(canon("M 0 0 L 1 0 Z Z"), "M 0 0 L 1 0 L 0 0 Z");
        assert_eq!(canon("M 0 0 Z"), "M 0 0");
    }

    #[test]
    fn smooth_cubic_reflects_only_after_cubic() {
        let cfg = EditorConfig::default();
        let cmds = parse_descriptor("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0", &cfg).unwrap();
        let n = normalize(&cmds, &cfg).unwrap();
        assert_eq!(
            n.segments[2],
            Segment::CubicTo {
                c1: Vec2::new(10.0, -10.0),
                c2: Vec2::new(20.0, -10.0),
                to: Vec2::new(20.0, 0.0)
            }
        );
        assert_eq!(n.smooth, vec![false, false, true]);

        let cmds = parse_descriptor("M 0 0 L 10 0 S 20 10 20 0", &cfg).unwrap();
        let n = normalize(&cmds, &cfg).unwrap();
        assert_eq!(
            n.segments[2],
            Segment::CubicTo {
                c1: Vec2::new(10.0, 0.0),
                c2: Vec2::new(20.0, 10.0),
                to: Vec2::new(20.0, 0.0)
            }
        );
        assert!(!n.smooth[2]);
    }

    #[test]
    fn smooth_quad_reflects_after_quad_only() {
        let cfg = EditorConfig::default();
        // Q control (3,6) reflected about (6,0) gives (9,-6)
        let cmds = parse_descriptor("M 0 0 Q 3 6 6 0 T 12 0", &cfg).unwrap();
        let n = normalize(&cmds, &cfg).unwrap();
        match n.segments[2] {
            Segment::CubicTo { c1, c2, .. } => {
                assert!((c1.x - 8.0).abs() < 1e-5 && (c1.y + 4.0).abs() < 1e-5);
                assert!((c2.x - 10.0).abs() < 1e-5 && (c2.y + 4.0).abs() < 1e-5);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(n.smooth[2]);

        // A cubic before T does not count as a quadratic
        let cmds = parse_descriptor("M 0 0 C 1 1 2 2 3 0 T 6 0", &cfg).unwrap();
        let n = normalize(&cmds, &cfg).unwrap();
        match n.segments[2] {
            Segment::CubicTo { c1, .. } => assert_eq!(c1, Vec2::new(3.0, 0.0)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn zero_radius_arc_becomes_line() {
        assert_eq!(canon("M 0 0 A 0 5 0 0 1 10 0"), "M 0 0 L 10 0");
        assert_eq!(canon("M 0 0 A -5 5 30 1 0 10 0"), "M 0 0 A 5 5 30 1 0 10 0");
    }

    #[test]
    fn unknown_commands_are_dropped() {
        assert_eq!(canon("M 0 0 K 4 4 L 1 1"), "M 0 0 L 1 1");
    }

    #[test]
    fn subpath_cap_is_enforced() {
        let cfg = EditorConfig {
            max_subpaths: 1,
            ..Default::default()
        };
        let cmds = parse_descriptor("M 0 0 L 1 1 Z M 5 5 L 6 6", &cfg).unwrap();
        assert!(matches!(
            normalize(&cmds, &cfg),
            Err(PathError::LimitExceeded { what: "subpaths", .. })
        ));
    }
}
