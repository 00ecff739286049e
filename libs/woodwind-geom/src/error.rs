//! # Geometry Errors
//!
//! Error types for planar geometry operations.

use thiserror::Error;

/// Errors that can occur while building or transforming 2D geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeomError {
    /// A loop needs at least three points.
    #[error("Loop needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    /// A generator or transformation was given an unusable value.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// The operation exists in the API but has no backing implementation.
    #[error("Not implemented: {operation}")]
    NotImplemented { operation: String },
}

impl GeomError {
    /// Creates an invalid parameter error.
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Creates a not-implemented error.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }
}

/// Result type alias for geometry operations.
pub type GeomResult<T> = Result<T, GeomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeomError::invalid("diameter", "must be positive");
        assert!(err.to_string().contains("diameter"));
        assert!(err.to_string().contains("positive"));

        let err = GeomError::TooFewPoints { count: 2 };
        assert_eq!(err.to_string(), "Loop needs at least 3 points, got 2");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeomError>();
    }
}
