//! HTTP outbound adapter.
//!
//! This module provides a blocking reqwest implementation of the
//! `VehicleSource` port.

mod config;
mod dto;
mod http_source;

pub use config::{
    DEFAULT_COLLECTION_PATH, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, PayloadEncoding,
    VehicleHttpConfig,
};
pub use http_source::{HttpSourceBuildError, VehicleHttpSource};
