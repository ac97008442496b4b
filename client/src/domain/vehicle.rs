//! Vehicle data model.
//!
//! A [`Vehicle`] is a plain value record: an optional server-assigned
//! [`VehicleId`] plus the caller-editable [`VehicleDetails`]. The details are
//! exactly what travels in create and update request bodies; the identifier
//! only ever appears in URLs.

use std::fmt;
use std::str::FromStr;

use great_circle::{CoordinateError, GeoPoint};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Server-assigned vehicle identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(i64);

impl VehicleId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for VehicleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VehicleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Caller-editable vehicle attributes.
///
/// Coordinates are in degrees. Serialises to the request body shape used by
/// create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDetails {
    /// Display name, e.g. `"Toyota"`.
    pub name: String,
    /// Model name, e.g. `"Camry"`.
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Paint colour.
    pub color: String,
    /// Price exactly as the server holds it, integer or fractional.
    pub price: Number,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// A vehicle record as seen by the client.
///
/// ## Invariants
/// - `id` is present only once the server has assigned one and is never
///   changed in place; [`Vehicle::with_id`] and [`Vehicle::without_id`]
///   return new records.
///
/// # Examples
/// ```
/// use vehicle_client::domain::{Vehicle, VehicleDetails, VehicleId};
///
/// let vehicle = Vehicle::new(VehicleDetails {
///     name: "Toyota".to_owned(),
///     model: "Camry".to_owned(),
///     year: 2021,
///     color: "red".to_owned(),
///     price: 21_000.into(),
///     latitude: 55.75,
///     longitude: 37.61,
/// })
/// .with_id(VehicleId::new(7));
///
/// assert_eq!(vehicle.id(), Some(VehicleId::new(7)));
/// assert_eq!(vehicle.to_string(), "<Vehicle: Toyota Camry 2021 red 21000>");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<VehicleId>,
    #[serde(flatten)]
    details: VehicleDetails,
}

impl Vehicle {
    /// Build a record that the server has not seen yet.
    pub fn new(details: VehicleDetails) -> Self {
        Self { id: None, details }
    }

    /// Return this record carrying `id`.
    pub fn with_id(self, id: VehicleId) -> Self {
        Self {
            id: Some(id),
            details: self.details,
        }
    }

    /// Return this record with its identifier stripped.
    pub fn without_id(self) -> Self {
        Self {
            id: None,
            details: self.details,
        }
    }

    /// Server-assigned identifier, if any.
    pub fn id(&self) -> Option<VehicleId> {
        self.id
    }

    /// Editable attributes; also the request body for create and update.
    pub fn details(&self) -> &VehicleDetails {
        &self.details
    }

    /// Mutable access to the editable attributes.
    pub fn details_mut(&mut self) -> &mut VehicleDetails {
        &mut self.details
    }

    /// Consume the record, keeping only the editable attributes.
    pub fn into_details(self) -> VehicleDetails {
        self.details
    }

    /// Validated position of this vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when the stored latitude or longitude
    /// cannot describe a point on the globe.
    pub fn coordinates(&self) -> Result<GeoPoint, CoordinateError> {
        GeoPoint::from_degrees(self.details.latitude, self.details.longitude)
    }

    /// Value of one field as it appears on the wire.
    ///
    /// Returns `None` for [`VehicleField::Id`] when no identifier is set.
    pub fn field_value(&self, field: VehicleField) -> Option<Value> {
        let details = &self.details;
        match field {
            VehicleField::Id => self.id.map(|id| Value::from(id.get())),
            VehicleField::Name => Some(Value::from(details.name.as_str())),
            VehicleField::Model => Some(Value::from(details.model.as_str())),
            VehicleField::Year => Some(Value::from(details.year)),
            VehicleField::Color => Some(Value::from(details.color.as_str())),
            VehicleField::Price => Some(Value::Number(details.price.clone())),
            VehicleField::Latitude => Some(Value::from(details.latitude)),
            VehicleField::Longitude => Some(Value::from(details.longitude)),
        }
    }

    /// Project the record into a field-name keyed map.
    pub fn field_map(&self) -> Map<String, Value> {
        VehicleField::ALL
            .into_iter()
            .filter_map(|field| {
                self.field_value(field)
                    .map(|value| (field.as_str().to_owned(), value))
            })
            .collect()
    }

    /// Request body projection: every field except the identifier.
    pub fn payload(&self) -> Map<String, Value> {
        let mut map = self.field_map();
        map.remove(VehicleField::Id.as_str());
        map
    }
}

impl From<VehicleDetails> for Vehicle {
    fn from(value: VehicleDetails) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = &self.details;
        write!(
            f,
            "<Vehicle: {} {} {} {} {}>",
            details.name, details.model, details.year, details.color, details.price
        )
    }
}

/// Wire-level vehicle field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleField {
    /// `id`
    Id,
    /// `name`
    Name,
    /// `model`
    Model,
    /// `year`
    Year,
    /// `color`
    Color,
    /// `price`
    Price,
    /// `latitude`
    Latitude,
    /// `longitude`
    Longitude,
}

impl VehicleField {
    /// Every field in wire order.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Name,
        Self::Model,
        Self::Year,
        Self::Color,
        Self::Price,
        Self::Latitude,
        Self::Longitude,
    ];

    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Model => "model",
            Self::Year => "year",
            Self::Color => "color",
            Self::Price => "price",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

impl fmt::Display for VehicleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a name that is not a vehicle field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle field `{0}`")]
pub struct UnknownVehicleField(pub String);

impl FromStr for VehicleField {
    type Err = UnknownVehicleField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownVehicleField(s.to_owned()))
    }
}
