// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_DENOM: f32 = 1e-8;          // denominator guard for roots/ratios
pub const EPS_TRACE: f32 = 1e-3;          // traced length below which a loop is degenerate

// Adaptive subdivision cap
pub const MAX_SUBDIV_DEPTH: u32 = 16;

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn same_point(ax: f32, ay: f32, bx: f32, by: f32, eps: f32) -> bool {
    approx_eq(ax, bx, eps) && approx_eq(ay, by, eps)
}
