//! Great-circle distances on a spherical Earth.
//!
//! The crate offers the raw [`haversine`] formula over radians and a
//! validated [`GeoPoint`] for callers holding coordinates in degrees. The
//! Earth is modelled as a sphere of radius [`EARTH_MEAN_RADIUS_METRES`]; this
//! is the mean-radius approximation, not the WGS84 ellipsoid.
//!
//! # Example
//!
//! ```
//! use great_circle::GeoPoint;
//!
//! let origin = GeoPoint::from_degrees(0.0, 0.0).expect("valid point");
//! let east = GeoPoint::from_degrees(0.0, 1.0).expect("valid point");
//!
//! let metres = origin.distance_to(&east);
//! assert!((metres - 111_195.0).abs() < 1.0);
//! ```

mod error;
mod point;

pub use error::CoordinateError;
pub use point::GeoPoint;

/// Mean Earth radius in metres.
pub const EARTH_MEAN_RADIUS_METRES: f64 = 6_371_000.0;

/// Haversine distance in metres between two points given in radians.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`, then
/// `distance = 2·asin(√a)·R`. The intermediate `a` is clamped to `[0, 1]`
/// so rounding near antipodal points cannot produce `NaN`.
///
/// # Examples
///
/// ```
/// use great_circle::haversine;
///
/// let lat = 0.7_f64;
/// let lon = -1.2_f64;
/// assert_eq!(haversine(lat, lon, lat, lon), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the haversine formula is floating-point by definition"
)]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let half_d_lat = (lat2 - lat1) / 2.0;
    let half_d_lon = (lon2 - lon1) / 2.0;
    let a = half_d_lat.sin().powi(2) + lat1.cos() * lat2.cos() * half_d_lon.sin().powi(2);
    let central_angle = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    central_angle * EARTH_MEAN_RADIUS_METRES
}
