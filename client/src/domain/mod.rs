//! Domain primitives, ports, and the vehicle manager service.
//!
//! Purpose: Define the vehicle record, the filter criterion, the error
//! taxonomy callers match on, and the [`VehicleManager`] that drives the
//! [`ports::VehicleSource`] port. Nothing here knows about HTTP.
//!
//! Public surface:
//! - Vehicle / VehicleDetails / VehicleId: the record and its parts.
//! - VehicleField / VehicleFilter: field projection and filtering.
//! - Error / ErrorCode: failures surfaced by every operation.
//! - VehicleManager: CRUD, distance, and nearest-neighbour operations.

pub mod error;
pub mod ports;
pub mod vehicle;
pub mod vehicle_filter;
pub mod vehicle_manager;

pub use self::error::{Error, ErrorCode};
pub use self::vehicle::{UnknownVehicleField, Vehicle, VehicleDetails, VehicleField, VehicleId};
pub use self::vehicle_filter::VehicleFilter;
pub use self::vehicle_manager::VehicleManager;

/// Convenient result alias for vehicle operations.
///
/// # Examples
/// ```
/// use vehicle_client::domain::{Error, VehicleResult};
///
/// fn require_id(id: Option<i64>) -> VehicleResult<i64> {
///     id.ok_or_else(|| Error::precondition("id required"))
/// }
///
/// assert!(require_id(None).is_err());
/// ```
pub type VehicleResult<T> = Result<T, Error>;
