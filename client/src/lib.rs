//! Client for a remote REST collection of vehicles.
//!
//! The [`domain`] layer holds the vehicle record, the error taxonomy, and the
//! [`domain::VehicleManager`] service. [`outbound::http`] implements the
//! `VehicleSource` port over HTTP, and [`config`] loads connection settings.

pub mod config;
pub mod domain;
pub mod outbound;
