//! Elliptical arc helpers built on the endpoint → center conversion of
//! SVG implementation notes B.2.4.

use crate::geometry::tolerance::{clamp01, EPS_LEN};
use crate::model::{ArcParams, Bounds, Vec2};
use std::f32::consts::{PI, TAU};

/// Center parameterization of an arc segment.
#[derive(Clone, Copy, Debug)]
pub struct CenterArc {
    pub center: Vec2,
    /// Radii after out-of-range correction.
    pub rx: f32,
    pub ry: f32,
    pub sin_phi: f32,
    pub cos_phi: f32,
    /// Start angle, radians.
    pub theta1: f32,
    /// Signed sweep, radians.
    pub delta: f32,
}

impl CenterArc {
    /// Convert an endpoint-parameterized arc. `None` means the arc degenerates
    /// into the chord (zero radius) or vanishes (coincident endpoints).
    pub fn from_endpoints(from: Vec2, arc: &ArcParams, to: Vec2) -> Option<CenterArc> {
        let mut rx = arc.rx.abs();
        let mut ry = arc.ry.abs();
        if rx <= EPS_LEN || ry <= EPS_LEN {
            return None;
        }
        let phi = arc.rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let mid_x = (from.x - to.x) / 2.0;
        let mid_y = (from.y - to.y) / 2.0;
        let x1_ = cos_phi * mid_x + sin_phi * mid_y;
        let y1_ = -sin_phi * mid_x + cos_phi * mid_y;

        // Scale the radii up until a solution exists
        let lambda = (x1_ / rx).powi(2) + (y1_ / ry).powi(2);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        let d = (rx * y1_).powi(2) + (ry * x1_).powi(2);
        if d <= 0.0 {
            return None;
        }
        let mut k = ((rx * ry).powi(2) / d - 1.0).abs().sqrt();
        if arc.sweep == arc.large_arc {
            k = -k;
        }
        let cx_ = k * rx * y1_ / ry;
        let cy_ = -k * ry * x1_ / rx;

        let center = Vec2 {
            x: cos_phi * cx_ - sin_phi * cy_ + (from.x + to.x) / 2.0,
            y: sin_phi * cx_ + cos_phi * cy_ + (from.y + to.y) / 2.0,
        };

        let ux = (x1_ - cx_) / rx;
        let uy = (y1_ - cy_) / ry;
        let vx = (-x1_ - cx_) / rx;
        let vy = (-y1_ - cy_) / ry;
        let theta1 = uy.atan2(ux);
        let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
        if arc.sweep && delta < 0.0 {
            delta += TAU;
        } else if !arc.sweep && delta > 0.0 {
            delta -= TAU;
        }

        Some(CenterArc {
            center,
            rx,
            ry,
            sin_phi,
            cos_phi,
            theta1,
            delta,
        })
    }

    pub fn point_at_angle(&self, theta: f32) -> Vec2 {
        let (s, c) = theta.sin_cos();
        Vec2 {
            x: self.center.x + self.rx * self.cos_phi * c - self.ry * self.sin_phi * s,
            y: self.center.y + self.rx * self.sin_phi * c + self.ry * self.cos_phi * s,
        }
    }

    /// Point at parameter `t` ∈ [0, 1] along the sweep.
    pub fn eval(&self, t: f32) -> Vec2 {
        self.point_at_angle(self.theta1 + self.delta * clamp01(t))
    }

    /// Whether `theta` lies within the swept range.
    fn covers(&self, theta: f32) -> bool {
        let (lo, hi) = if self.delta >= 0.0 {
            (self.theta1, self.theta1 + self.delta)
        } else {
            (self.theta1 + self.delta, self.theta1)
        };
        let t = lo + (theta - lo).rem_euclid(TAU);
        t <= hi
    }

    pub(crate) fn bounds(&self, from: Vec2, to: Vec2) -> Bounds {
        let mut b = Bounds::empty();
        b.include(from);
        b.include(to);
        // dx/dθ = 0 and dy/dθ = 0 on the rotated ellipse
        let tx = (-self.ry * self.sin_phi).atan2(self.rx * self.cos_phi);
        let ty = (self.ry * self.cos_phi).atan2(self.rx * self.sin_phi);
        for base in [tx, ty] {
            for theta in [base, base + PI] {
                if self.covers(theta) {
                    b.include(self.point_at_angle(theta));
                }
            }
        }
        b
    }

    /// Polyline approximation of the arc length.
    pub fn length(&self, tolerance: f32) -> f32 {
        let r = self.rx.max(self.ry);
        let span = r * self.delta.abs();
        let n = ((span / tolerance.max(EPS_LEN)).sqrt().ceil() as usize).clamp(4, 256);
        let mut prev = self.eval(0.0);
        let mut len = 0.0;
        for i in 1..=n {
            let p = self.eval(i as f32 / n as f32);
            len += prev.distance(p);
            prev = p;
        }
        len
    }
}
