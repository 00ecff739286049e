//! # Model Errors
//!
//! Error types for solid composition, rendering and segmenting.

use thiserror::Error;
use woodwind_geom::GeomError;
use woodwind_mesh::MeshError;

/// Errors that can occur while composing or rendering a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A clipped segment is shorter or longer than requested; the
    /// fabrication padding must be increased.
    #[error("Insufficient padding: expected extent {expected}, got {actual}")]
    InsufficientPadding { expected: f64, actual: f64 },

    /// The segment window is not wider than the body, so clipping would
    /// shave its sides.
    #[error("Clip radius {clip_radius} does not cover the body (needs more than {required})")]
    ClipRadiusTooSmall { required: f64, clip_radius: f64 },

    /// `add` was called on a node that cannot hold children.
    #[error("Cannot add children to a {kind} node")]
    NotAGroup { kind: &'static str },

    /// A group node without children reached a back end that needs one.
    #[error("Empty {kind} group")]
    EmptyGroup { kind: &'static str },

    /// The operation has no backing implementation.
    #[error("Not implemented: {operation}")]
    NotImplemented { operation: String },

    /// Error from the mesh layer
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Error from planar geometry
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeomError),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
