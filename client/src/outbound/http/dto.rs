//! DTOs for the vehicle JSON wire format.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records in one pass. Request bodies borrow from the domain details so
//! nothing is cloned on the way out.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::{Vehicle, VehicleDetails, VehicleId};

#[derive(Debug, Deserialize)]
pub(super) struct VehicleDto {
    #[serde(default)]
    pub(super) id: Option<i64>,
    pub(super) name: String,
    pub(super) model: String,
    pub(super) year: i32,
    pub(super) color: String,
    pub(super) price: Number,
    pub(super) latitude: f64,
    pub(super) longitude: f64,
}

impl VehicleDto {
    pub(super) fn into_domain(self) -> Vehicle {
        let vehicle = Vehicle::new(VehicleDetails {
            name: self.name,
            model: self.model,
            year: self.year,
            color: self.color,
            price: self.price,
            latitude: self.latitude,
            longitude: self.longitude,
        });
        match self.id {
            Some(id) => vehicle.with_id(VehicleId::new(id)),
            None => vehicle,
        }
    }
}

/// Request body for create and update calls. Never carries the id.
#[derive(Debug, Serialize)]
pub(super) struct VehicleBodyDto<'a> {
    pub(super) name: &'a str,
    pub(super) model: &'a str,
    pub(super) year: i32,
    pub(super) color: &'a str,
    pub(super) price: &'a Number,
    pub(super) latitude: f64,
    pub(super) longitude: f64,
}

impl<'a> From<&'a VehicleDetails> for VehicleBodyDto<'a> {
    fn from(details: &'a VehicleDetails) -> Self {
        Self {
            name: details.name.as_str(),
            model: details.model.as_str(),
            year: details.year,
            color: details.color.as_str(),
            price: &details.price,
            latitude: details.latitude,
            longitude: details.longitude,
        }
    }
}
