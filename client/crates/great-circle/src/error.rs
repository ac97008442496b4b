//! Error types for coordinate validation.

use thiserror::Error;

/// Errors raised when a latitude/longitude pair cannot describe a point on
/// the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude or longitude is `NaN` or infinite.
    #[error("coordinates must be finite, got ({latitude}, {longitude})")]
    NonFinite {
        /// Offending latitude in degrees.
        latitude: f64,
        /// Offending longitude in degrees.
        longitude: f64,
    },

    /// Latitude lies outside `[-90, 90]`.
    #[error("latitude must be within [-90, 90], got {latitude}")]
    LatitudeOutOfRange {
        /// Offending latitude in degrees.
        latitude: f64,
    },

    /// Longitude lies outside `[-180, 180]`.
    #[error("longitude must be within [-180, 180], got {longitude}")]
    LongitudeOutOfRange {
        /// Offending longitude in degrees.
        longitude: f64,
    },
}
