//! Error types for osteoview.

use thiserror::Error;

/// The main error type for osteoview operations.
#[derive(Error, Debug)]
pub enum OsteoviewError {
    /// The volumetric field violates a construction invariant.
    #[error("malformed volume: {0}")]
    MalformedVolume(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// An operation required a non-empty mesh.
    #[error("empty mesh: {0}")]
    EmptyMesh(String),

    /// The viewport layout does not partition the render target.
    #[error("invalid viewport layout: {0}")]
    InvalidLayout(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for osteoview operations.
pub type Result<T> = std::result::Result<T, OsteoviewError>;
