//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Latitude or longitude outside its valid range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Malformed bounding box
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
}
