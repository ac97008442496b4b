//! Driven port for reading and writing the remote vehicle collection.
//!
//! The domain owns the request and response contract so the manager stays
//! agnostic of how vehicles reach it.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::define_port_error;
use crate::domain::{Vehicle, VehicleDetails, VehicleId};

define_port_error! {
    /// Errors surfaced while calling the vehicle collection.
    pub enum VehicleSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "vehicle transport failed: {message}",
        /// The request exceeded its timeout.
        Timeout { message: String } =>
            "vehicle request timed out: {message}",
        /// The server answered with a non-success status.
        Status { status: u16, message: String } =>
            "vehicle endpoint returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "vehicle response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest { message: String } =>
            "vehicle request invalid: {message}",
    }
}

/// Port for the remote vehicle collection.
#[cfg_attr(test, mockall::automock)]
pub trait VehicleSource: Send + Sync {
    /// Fetch every vehicle in collection order.
    fn fetch_all(&self) -> Result<Vec<Vehicle>, VehicleSourceError>;

    /// Fetch one vehicle by identifier.
    fn fetch_one(&self, id: VehicleId) -> Result<Vehicle, VehicleSourceError>;

    /// Submit a new vehicle.
    ///
    /// Returns the server's echo of the stored record when it sends one.
    fn create(&self, details: &VehicleDetails) -> Result<Option<Vehicle>, VehicleSourceError>;

    /// Overwrite the attributes of an existing vehicle.
    fn replace(&self, id: VehicleId, details: &VehicleDetails) -> Result<(), VehicleSourceError>;

    /// Delete a vehicle.
    fn remove(&self, id: VehicleId) -> Result<(), VehicleSourceError>;
}

/// In-memory fixture implementation keyed by identifier.
///
/// Missing identifiers answer with a 404 status error, mirroring a REST
/// collection. New records receive the identifier after the largest stored
/// one; once that would pass `i64::MAX`, creation fails with a 409.
#[derive(Debug, Default)]
pub struct FixtureVehicleSource {
    vehicles: Mutex<BTreeMap<VehicleId, Vehicle>>,
}

impl FixtureVehicleSource {
    /// Seed the fixture with records; records without an id are skipped.
    pub fn new(vehicles: impl IntoIterator<Item = Vehicle>) -> Self {
        let vehicles = vehicles
            .into_iter()
            .filter_map(|vehicle| vehicle.id().map(|id| (id, vehicle)))
            .collect();
        Self {
            vehicles: Mutex::new(vehicles),
        }
    }

    fn with_store<T>(
        &self,
        action: impl FnOnce(&mut BTreeMap<VehicleId, Vehicle>) -> Result<T, VehicleSourceError>,
    ) -> Result<T, VehicleSourceError> {
        let mut guard = self
            .vehicles
            .lock()
            .map_err(|_| VehicleSourceError::transport("fixture store poisoned"))?;
        action(&mut guard)
    }
}

fn not_found(id: VehicleId) -> VehicleSourceError {
    VehicleSourceError::status(404_u16, format!("vehicle {id} not found"))
}

impl VehicleSource for FixtureVehicleSource {
    fn fetch_all(&self) -> Result<Vec<Vehicle>, VehicleSourceError> {
        self.with_store(|store| Ok(store.values().cloned().collect()))
    }

    fn fetch_one(&self, id: VehicleId) -> Result<Vehicle, VehicleSourceError> {
        self.with_store(|store| store.get(&id).cloned().ok_or_else(|| not_found(id)))
    }

    fn create(&self, details: &VehicleDetails) -> Result<Option<Vehicle>, VehicleSourceError> {
        self.with_store(|store| {
            let next = match store.keys().next_back() {
                Some(last) => last.get().checked_add(1).ok_or_else(|| {
                    VehicleSourceError::status(
                        409_u16,
                        format!("no vehicle identifier left after {last}"),
                    )
                })?,
                None => 1,
            };
            let id = VehicleId::new(next);
            let vehicle = Vehicle::new(details.clone()).with_id(id);
            store.insert(id, vehicle.clone());
            Ok(Some(vehicle))
        })
    }

    fn replace(&self, id: VehicleId, details: &VehicleDetails) -> Result<(), VehicleSourceError> {
        self.with_store(|store| {
            let slot = store.get_mut(&id).ok_or_else(|| not_found(id))?;
            *slot = Vehicle::new(details.clone()).with_id(id);
            Ok(())
        })
    }

    fn remove(&self, id: VehicleId) -> Result<(), VehicleSourceError> {
        self.with_store(|store| store.remove(&id).map(|_| ()).ok_or_else(|| not_found(id)))
    }
}
