//! Error types for descriptor ingestion and configuration.
//!
//! Stale-reference edits are not errors: split/delete report them through
//! their return values. Only input that cannot become a path ends up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    /// The descriptor produced no vertices at all.
    #[error("descriptor produced no vertices")]
    EmptyDescriptor,

    /// A subpath collapsed to a single vertex while still tracing a visible length.
    #[error("subpath {subpath} is degenerate: {vertices} vertex(es) tracing length {length}")]
    DegenerateSubpath {
        subpath: usize,
        vertices: usize,
        length: f32,
    },

    /// An ingestion cap was exceeded.
    #[error("{what} limit of {limit} exceeded")]
    LimitExceeded { what: &'static str, limit: usize },

    /// A coordinate lies outside the accepted numeric range.
    #[error("coordinate {value} out of range")]
    CoordinateOutOfRange { value: f32 },

    /// A caller-supplied parameter was NaN or infinite.
    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PathError {
    /// Stable machine-readable code, used by host bindings.
    pub fn code(&self) -> &'static str {
        match self {
            PathError::EmptyDescriptor => "empty_descriptor",
            PathError::DegenerateSubpath { .. } => "degenerate_subpath",
            PathError::LimitExceeded { .. } => "limit_exceeded",
            PathError::CoordinateOutOfRange { .. } => "out_of_range",
            PathError::NonFinite(_) => "non_finite",
            PathError::InvalidConfig(_) | PathError::Config(_) => "invalid_config",
        }
    }
}

pub type Result<T, E = PathError> = std::result::Result<T, E>;
