//! Vehicle manager service.
//!
//! Translates caller operations into calls on the [`VehicleSource`] port and
//! runs the linear nearest-neighbour scan over the fetched collection.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::ports::{VehicleSource, VehicleSourceError};
use super::{Error, Vehicle, VehicleFilter, VehicleId, VehicleResult};

fn map_source_error(error: VehicleSourceError) -> Error {
    match error {
        VehicleSourceError::Transport { message } | VehicleSourceError::Timeout { message } => {
            Error::transport(message)
        }
        VehicleSourceError::Status { status, message } => Error::protocol(status, message),
        VehicleSourceError::Decode { message } => Error::decode(message),
        VehicleSourceError::InvalidRequest { message } => Error::precondition(message),
    }
}

/// Haversine distance in metres between the stored positions.
///
/// Coordinates are used as stored, without range checks, so a record in a
/// 0..360 longitude convention still yields a distance.
fn distance_between(from: &Vehicle, to: &Vehicle) -> f64 {
    let (from, to) = (from.details(), to.details());
    great_circle::haversine(
        from.latitude.to_radians(),
        from.longitude.to_radians(),
        to.latitude.to_radians(),
        to.longitude.to_radians(),
    )
}

/// Vehicle operations over one remote collection.
///
/// Holds no mutable state, so one manager may be shared across threads.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use vehicle_client::domain::ports::FixtureVehicleSource;
/// use vehicle_client::domain::{Vehicle, VehicleDetails, VehicleId, VehicleManager};
///
/// let at = |id: i64, longitude: f64| {
///     Vehicle::new(VehicleDetails {
///         name: format!("car-{id}"),
///         model: "M".to_owned(),
///         year: 2020,
///         color: "red".to_owned(),
///         price: 1.into(),
///         latitude: 0.0,
///         longitude,
///     })
///     .with_id(VehicleId::new(id))
/// };
/// let source = FixtureVehicleSource::new([at(1, 0.0), at(2, 1.0), at(3, 5.0)]);
/// let manager = VehicleManager::new(Arc::new(source));
///
/// let nearest = manager.get_nearest(VehicleId::new(1)).expect("fetch succeeds");
/// assert_eq!(nearest.and_then(|v| v.id()), Some(VehicleId::new(2)));
/// ```
#[derive(Debug)]
pub struct VehicleManager<S> {
    source: Arc<S>,
}

impl<S> Clone for VehicleManager<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> VehicleManager<S> {
    /// Create a manager over the given vehicle source.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S> VehicleManager<S>
where
    S: VehicleSource,
{
    /// Fetch every vehicle in collection order.
    ///
    /// # Errors
    ///
    /// Transport, protocol, or decode failures from the source.
    pub fn list_all(&self) -> VehicleResult<Vec<Vehicle>> {
        self.source.fetch_all().map_err(map_source_error)
    }

    /// Fetch the collection and keep vehicles matching one field/value pair.
    ///
    /// # Errors
    ///
    /// A precondition error unless exactly one pair naming a known field is
    /// given; otherwise the same failures as [`Self::list_all`].
    pub fn filter<I, K, V>(&self, criteria: I) -> VehicleResult<Vec<Vehicle>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let filter = VehicleFilter::from_pairs(criteria)?;
        self.filter_with(&filter)
    }

    /// Fetch the collection and keep vehicles matching `filter`.
    ///
    /// # Errors
    ///
    /// The same failures as [`Self::list_all`].
    pub fn filter_with(&self, filter: &VehicleFilter) -> VehicleResult<Vec<Vehicle>> {
        let mut vehicles = self.list_all()?;
        vehicles.retain(|vehicle| filter.matches(vehicle));
        Ok(vehicles)
    }

    /// Fetch one vehicle.
    ///
    /// # Errors
    ///
    /// A protocol error (typically 404) when the server has no such vehicle,
    /// or transport and decode failures.
    pub fn get(&self, id: VehicleId) -> VehicleResult<Vehicle> {
        self.source.fetch_one(id).map_err(map_source_error)
    }

    /// Submit a new vehicle.
    ///
    /// Returns the server's echo, carrying its assigned id, when the server
    /// sends one back; otherwise the input record unchanged.
    ///
    /// # Errors
    ///
    /// Transport or protocol failures from the source.
    pub fn create(&self, vehicle: &Vehicle) -> VehicleResult<Vehicle> {
        let echoed = self
            .source
            .create(vehicle.details())
            .map_err(map_source_error)?;
        Ok(echoed.unwrap_or_else(|| vehicle.clone()))
    }

    /// Overwrite an existing vehicle with the record's attributes.
    ///
    /// The identifier addresses the resource and is left out of the body.
    /// Returns the submitted record without its identifier.
    ///
    /// # Errors
    ///
    /// A precondition error when the record has no id, otherwise transport
    /// or protocol failures from the source.
    pub fn update(&self, vehicle: &Vehicle) -> VehicleResult<Vehicle> {
        let id = vehicle
            .id()
            .ok_or_else(|| Error::precondition("update requires a vehicle id"))?;
        self.source
            .replace(id, vehicle.details())
            .map_err(map_source_error)?;
        Ok(vehicle.clone().without_id())
    }

    /// Delete a vehicle on the server.
    ///
    /// # Errors
    ///
    /// A protocol error when the server rejects the deletion, for instance
    /// because the id does not exist.
    pub fn delete(&self, id: VehicleId) -> VehicleResult<()> {
        self.source.remove(id).map_err(map_source_error)
    }

    /// Great-circle distance in metres between two vehicles.
    ///
    /// # Errors
    ///
    /// Fetch failures for either vehicle.
    pub fn get_distance(&self, first: VehicleId, second: VehicleId) -> VehicleResult<f64> {
        let first = self.get(first)?;
        let second = self.get(second)?;
        Ok(distance_between(&first, &second))
    }

    /// Closest other vehicle to `id`, or `None` when the collection holds no
    /// other vehicle.
    ///
    /// Records sharing the target's id are skipped. On equal distances the
    /// first one in collection order wins.
    ///
    /// # Errors
    ///
    /// Fetch failures for the target or the collection.
    pub fn get_nearest(&self, id: VehicleId) -> VehicleResult<Option<Vehicle>> {
        let mut nearest: Option<(Vehicle, f64)> = None;
        for (vehicle, distance) in self.neighbours_of(id)? {
            if nearest.as_ref().is_none_or(|(_, best)| distance < *best) {
                nearest = Some((vehicle, distance));
            }
        }

        debug!(
            target_id = %id,
            nearest_id = ?nearest.as_ref().and_then(|(vehicle, _)| vehicle.id()),
            distance_m = ?nearest.as_ref().map(|(_, distance)| *distance),
            "nearest vehicle resolved"
        );
        Ok(nearest.map(|(vehicle, _)| vehicle))
    }

    /// Every other vehicle paired with its distance from `id` in metres,
    /// closest first. Equal distances keep collection order.
    ///
    /// # Errors
    ///
    /// The same failures as [`Self::get_nearest`].
    pub fn distances_from(&self, id: VehicleId) -> VehicleResult<Vec<(Vehicle, f64)>> {
        let mut neighbours = self.neighbours_of(id)?;
        neighbours.sort_by(|(_, left), (_, right)| left.total_cmp(right));
        Ok(neighbours)
    }

    fn neighbours_of(&self, id: VehicleId) -> VehicleResult<Vec<(Vehicle, f64)>> {
        let target = self.get(id)?;
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|vehicle| vehicle.id() != Some(id))
            .map(|vehicle| {
                let distance = distance_between(&target, &vehicle);
                (vehicle, distance)
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "vehicle_manager_tests.rs"]
mod tests;
