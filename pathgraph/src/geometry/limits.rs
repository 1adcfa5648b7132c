// Default ingestion limits to harden against untrusted descriptors.
// EditorConfig starts from these and may tighten or relax them.

pub const MAX_DESCRIPTOR_LEN: usize = 8 * 1024 * 1024; // characters in one descriptor string
pub const MAX_COMMANDS: usize = 200_000;
pub const MAX_SUBPATHS: usize = 10_000;
pub const MAX_SEGMENTS: usize = 500_000; // canonical segments after expansion

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }
