//! Editor tolerances and ingestion limits.

use crate::error::{PathError, Result};
use crate::geometry::{limits, tolerance};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Two points closer than this are the same point (closepath, self-loops).
    pub close_epsilon: f32,
    /// Traced length at or below which a subpath or loop counts as zero-length.
    pub degenerate_length: f32,
    /// Create-drag rectangles narrower or shorter than this are discarded on commit.
    pub min_create_size: f32,
    /// Flatness tolerance for curve length estimates.
    pub arc_length_tolerance: f32,
    pub max_descriptor_len: usize,
    pub max_commands: usize,
    pub max_subpaths: usize,
    pub max_segments: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            close_epsilon: tolerance::EPS_POS,
            degenerate_length: tolerance::EPS_TRACE,
            min_create_size: 1.0,
            arc_length_tolerance: 0.25,
            max_descriptor_len: limits::MAX_DESCRIPTOR_LEN,
            max_commands: limits::MAX_COMMANDS,
            max_subpaths: limits::MAX_SUBPATHS,
            max_segments: limits::MAX_SEGMENTS,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EditorConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("close_epsilon", self.close_epsilon),
            ("degenerate_length", self.degenerate_length),
            ("arc_length_tolerance", self.arc_length_tolerance),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PathError::InvalidConfig(format!(
                    "{} must be finite and positive, got {}",
                    name, v
                )));
            }
        }
        if !self.min_create_size.is_finite() || self.min_create_size < 0.0 {
            return Err(PathError::InvalidConfig(format!(
                "min_create_size must be finite and non-negative, got {}",
                self.min_create_size
            )));
        }
        if self.max_commands == 0 || self.max_subpaths == 0 || self.max_segments == 0 {
            return Err(PathError::InvalidConfig("limits must be non-zero".into()));
        }
        Ok(())
    }
}
