//! Validated geographic points.

use std::fmt;

use crate::{CoordinateError, haversine};

/// A latitude/longitude pair in degrees.
///
/// ## Invariants
/// - Both components are finite.
/// - Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point from degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is not finite or
    /// falls outside its valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use great_circle::{CoordinateError, GeoPoint};
    ///
    /// assert!(GeoPoint::from_degrees(55.95, -3.19).is_ok());
    /// assert_eq!(
    ///     GeoPoint::from_degrees(91.0, 0.0),
    ///     Err(CoordinateError::LatitudeOutOfRange { latitude: 91.0 })
    /// );
    /// ```
    pub fn from_degrees(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine(
            self.latitude.to_radians(),
            self.longitude.to_radians(),
            other.latitude.to_radians(),
            other.longitude.to_radians(),
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
