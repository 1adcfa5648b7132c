//! Cubic Bézier curve utilities.
//!
//! Used by normalization (quadratic degree elevation), by the traced-length
//! checks that reject degenerate subpaths, and by bounding boxes.

use crate::geometry::tolerance::{EPS_DENOM, MAX_SUBDIV_DEPTH};
use crate::model::{Bounds, Vec2};

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Degree-elevate a quadratic with control point `q`.
    pub fn from_quadratic(p0: Vec2, q: Vec2, p3: Vec2) -> Self {
        const TWO_THIRDS: f32 = 2.0 / 3.0;
        Self {
            p0,
            p1: p0 + (q - p0) * TWO_THIRDS,
            p2: p3 + (q - p3) * TWO_THIRDS,
            p3,
        }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Vec2 {
            x: mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            y: mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        }
    }

    /// Compute approximate arc length using adaptive subdivision.
    pub fn arc_length(&self, tolerance: f32) -> f32 {
        arc_length_recursive(self.p0, self.p1, self.p2, self.p3, tolerance, 0)
    }

    /// Tight bounds: endpoints plus the curve at every extremum of x(t), y(t).
    pub(crate) fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        b.include(self.p0);
        b.include(self.p3);
        let mut roots = [0.0f32; 4];
        let mut n = 0;
        for (a, c1, c2, d) in [
            (self.p0.x, self.p1.x, self.p2.x, self.p3.x),
            (self.p0.y, self.p1.y, self.p2.y, self.p3.y),
        ] {
            for t in derivative_roots(a, c1, c2, d).into_iter().flatten() {
                roots[n] = t;
                n += 1;
            }
        }
        for &t in &roots[..n] {
            b.include(self.eval(t));
        }
        b
    }
}

/// Roots in (0, 1) of the derivative of one cubic coordinate.
fn derivative_roots(p0: f32, p1: f32, p2: f32, p3: f32) -> [Option<f32>; 2] {
    // B'(t)/3 = a t^2 + b t + c
    let a = -p0 + 3.0 * p1 - 3.0 * p2 + p3;
    let b = 2.0 * (p0 - 2.0 * p1 + p2);
    let c = p1 - p0;
    let inside = |t: f32| if t > 0.0 && t < 1.0 { Some(t) } else { None };
    if a.abs() <= EPS_DENOM {
        if b.abs() <= EPS_DENOM {
            return [None, None];
        }
        return [inside(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sq = disc.sqrt();
    [inside((-b + sq) / (2.0 * a)), inside((-b - sq) / (2.0 * a))]
}

/// Linear interpolation between two Vec2s.
#[inline]
fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a.lerp(b, t)
}

/// Recursive arc length computation with adaptive subdivision.
fn arc_length_recursive(
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    tolerance: f32,
    depth: u32,
) -> f32 {
    let chord = p0.distance(p3);
    let poly_len = p0.distance(p1) + p1.distance(p2) + p2.distance(p3);

    // If flat enough or max depth reached, use average of chord and polygon
    if depth >= MAX_SUBDIV_DEPTH || (poly_len - chord).abs() < tolerance {
        return (chord + poly_len) * 0.5;
    }

    // Subdivide at t=0.5 using de Casteljau
    let p01 = lerp_vec2(p0, p1, 0.5);
    let p12 = lerp_vec2(p1, p2, 0.5);
    let p23 = lerp_vec2(p2, p3, 0.5);
    let p012 = lerp_vec2(p01, p12, 0.5);
    let p123 = lerp_vec2(p12, p23, 0.5);
    let mid = lerp_vec2(p012, p123, 0.5);

    arc_length_recursive(p0, p01, p012, mid, tolerance, depth + 1)
        + arc_length_recursive(mid, p123, p23, p3, tolerance, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }

    #[test]
    fn test_eval_endpoints() {
        let curve = CubicBezier::new(
            vec2(0.0, 0.0),
            vec2(1.0, 2.0),
            vec2(3.0, 2.0),
            vec2(4.0, 0.0),
        );

        let start = curve.eval(0.0);
        let end = curve.eval(1.0);

        assert!((start.x - 0.0).abs() < 1e-6);
        assert!((start.y - 0.0).abs() < 1e-6);
        assert!((end.x - 4.0).abs() < 1e-6);
        assert!((end.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_quadratic_elevation_matches_quadratic() {
        let p0 = vec2(0.0, 0.0);
        let q = vec2(5.0, 10.0);
        let p3 = vec2(10.0, 0.0);
        let c = CubicBezier::from_quadratic(p0, q, p3);
        // Quadratic midpoint is (p0 + 2q + p3) / 4
        let mid = c.eval(0.5);
        assert!((mid.x - 5.0).abs() < 1e-5);
        assert!((mid.y - 5.0).abs() < 1e-5);
        assert!((c.p1.x - 10.0 / 3.0).abs() < 1e-5);
        assert!((c.p2.x - 20.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_straight_cubic_length() {
        let c = CubicBezier::new(vec2(0.0, 0.0), vec2(1.0, 0.0), vec2(2.0, 0.0), vec2(3.0, 0.0));
        assert!((c.arc_length(0.01) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounds_include_bulge() {
        // Symmetric arch peaking at y = 7.5
        let c = CubicBezier::new(vec2(0.0, 0.0), vec2(0.0, 10.0), vec2(10.0, 10.0), vec2(10.0, 0.0));
        let b = c.bounds();
        assert!((b.miny - 0.0).abs() < 1e-5);
        assert!((b.maxy - 7.5).abs() < 1e-4);
        assert!((b.minx - 0.0).abs() < 1e-5);
        assert!((b.maxx - 10.0).abs() < 1e-5);
    }
}
