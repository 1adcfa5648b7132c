//! Descriptor tokenizer: SVG path-data text → raw [`PathCommand`]s.
//!
//! Scanning is byte-oriented and best-effort. Unknown command letters are
//! kept as [`PathCommand::Unknown`] so normalization can drop them, and a
//! command whose argument list is cut short is discarded.

use crate::config::EditorConfig;
use crate::error::{PathError, Result};
use crate::geometry::limits;
use crate::model::{ArcParams, PathCommand, Vec2};
use tracing::debug;

struct Scanner<'a> {
    bytes: &'a [u8],
    i: usize,
}

impl<'a> Scanner<'a> {
    fn skip_ws(&mut self) {
        while self.i < self.bytes.len() {
            let c = self.bytes[self.i];
            if c == b' ' || c == b'\n' || c == b'\t' || c == b'\r' || c == b',' {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.i >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    fn digits(&mut self) -> usize {
        let start = self.i;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.i += 1;
        }
        self.i - start
    }

    /// Scans one number: sign, digits, fraction, exponent. `1.5.5` reads as
    /// `1.5` then `.5`, and `10-5` as `10` then `-5`.
    fn number(&mut self) -> Option<f32> {
        self.skip_ws();
        let start = self.i;
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.i += 1;
        }
        let mut had = self.digits() > 0;
        if self.peek() == Some(b'.') {
            self.i += 1;
            had |= self.digits() > 0;
        }
        if !had {
            self.i = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let mark = self.i;
            self.i += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.i += 1;
            }
            if self.digits() == 0 {
                self.i = mark;
            }
        }
        let s = std::str::from_utf8(&self.bytes[start..self.i]).ok()?;
        s.parse::<f32>().ok()
    }

    fn coord(&mut self) -> Result<Option<f32>> {
        match self.number() {
            Some(v) if limits::in_coord_bounds(v) => Ok(Some(v)),
            Some(v) => Err(PathError::CoordinateOutOfRange { value: v }),
            None => Ok(None),
        }
    }

    fn point(&mut self) -> Result<Option<Vec2>> {
        let x = match self.coord()? {
            Some(v) => v,
            None => return Ok(None),
        };
        Ok(self.coord()?.map(|y| Vec2 { x, y }))
    }

    fn flag(&mut self) -> Option<bool> {
        self.skip_ws();
        match self.peek() {
            Some(b'0') => {
                self.i += 1;
                Some(false)
            }
            Some(b'1') => {
                self.i += 1;
                Some(true)
            }
            _ => None,
        }
    }
}

/// Reads one argument list for `cmd`. `Ok(None)` means the list was incomplete.
fn read_args(sc: &mut Scanner<'_>, cmd: u8) -> Result<Option<PathCommand>> {
    let rel = cmd.is_ascii_lowercase();
    macro_rules! pt {
        () => {
            match sc.point()? {
                Some(p) => p,
                None => return Ok(None),
            }
        };
    }
    macro_rules! num {
        () => {
            match sc.coord()? {
                Some(v) => v,
                None => return Ok(None),
            }
        };
    }
    let c = match cmd.to_ascii_uppercase() {
        b'M' => PathCommand::MoveTo { rel, to: pt!() },
        b'L' => PathCommand::LineTo { rel, to: pt!() },
        b'H' => PathCommand::Horizontal { rel, x: num!() },
        b'V' => PathCommand::Vertical { rel, y: num!() },
        b'C' => {
            let c1 = pt!();
            let c2 = pt!();
            PathCommand::CubicTo { rel, c1, c2, to: pt!() }
        }
        b'S' => {
            let c2 = pt!();
            PathCommand::SmoothCubicTo { rel, c2, to: pt!() }
        }
        b'Q' => {
            let q = pt!();
            PathCommand::QuadTo { rel, q, to: pt!() }
        }
        b'T' => PathCommand::SmoothQuadTo { rel, to: pt!() },
        b'A' => {
            let rx = num!();
            let ry = num!();
            let rotation = num!();
            let large_arc = match sc.flag() {
                Some(f) => f,
                None => return Ok(None),
            };
            let sweep = match sc.flag() {
                Some(f) => f,
                None => return Ok(None),
            };
            let arc = ArcParams {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
            };
            PathCommand::ArcTo { rel, arc, to: pt!() }
        }
        _ => return Ok(None),
    };
    Ok(Some(c))
}

/// Tokenize a descriptor string into raw commands.
pub fn parse_descriptor(d: &str, cfg: &EditorConfig) -> Result<Vec<PathCommand>> {
    if d.len() > cfg.max_descriptor_len {
        return Err(PathError::LimitExceeded {
            what: "descriptor length",
            limit: cfg.max_descriptor_len,
        });
    }
    let mut sc = Scanner {
        bytes: d.as_bytes(),
        i: 0,
    };
    let mut out: Vec<PathCommand> = Vec::new();
    // Command that extra argument groups repeat; `None` after Z or a bad list.
    let mut last: Option<u8> = None;
    let push = |out: &mut Vec<PathCommand>, c: PathCommand| -> Result<()> {
        if out.len() >= cfg.max_commands {
            return Err(PathError::LimitExceeded {
                what: "commands",
                limit: cfg.max_commands,
            });
        }
        out.push(c);
        Ok(())
    };
    loop {
        sc.skip_ws();
        if sc.at_end() {
            break;
        }
        let c = sc.bytes[sc.i];
        let cmd = if c.is_ascii_alphabetic() {
            sc.i += 1;
            c
        } else if let Some(l) = last {
            l
        } else {
            // Stray argument or garbage with no command to attach to
            if sc.number().is_none() {
                sc.i += 1;
            }
            continue;
        };
        match cmd {
            b'Z' | b'z' => {
                push(&mut out, PathCommand::Close)?;
                last = None;
            }
            b'M' | b'm' | b'L' | b'l' | b'H' | b'h' | b'V' | b'v' | b'C' | b'c' | b'S'
            | b's' | b'Q' | b'q' | b'T' | b't' | b'A' | b'a' => match read_args(&mut sc, cmd)? {
                Some(pc) => {
                    push(&mut out, pc)?;
                    last = Some(match cmd {
                        b'M' => b'L',
                        b'm' => b'l',
                        other => other,
                    });
                }
                None => {
                    debug!("incomplete argument list for '{}' dropped", cmd as char);
                    last = None;
                }
            },
            other => {
                push(&mut out, PathCommand::Unknown(other as char))?;
                while sc.number().is_some() {}
                last = None;
            }
        }
    }
    Ok(out)
}
