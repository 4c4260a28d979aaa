//! # Mesh Errors
//!
//! Error types for profile construction and extrusion.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur during mesh generation.
///
/// Every variant aborts the single shape being built; nothing is shared
/// between requests, so other meshes are unaffected.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A shape parameter is outside the range the algorithms accept
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A face index does not refer to an existing face
    #[error("Face index out of range: {index} (faces: {count})")]
    FaceIndexOutOfRange { index: usize, count: usize },

    /// The mesher settings failed validation
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Writing a debug dump failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the shape parameters themselves.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
