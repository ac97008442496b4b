//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod vehicle_source;

#[cfg(test)]
pub use vehicle_source::MockVehicleSource;
pub use vehicle_source::{FixtureVehicleSource, VehicleSource, VehicleSourceError};
