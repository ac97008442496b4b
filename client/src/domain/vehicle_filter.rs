//! Single field/value criterion for client-side vehicle filtering.

use serde_json::{Number, Value};

use super::{Error, Vehicle, VehicleField};

/// Retains vehicles whose projected field equals a value.
///
/// Numbers compare by numeric value, so `2020.0` matches a year of `2020`
/// and `0` matches a latitude of `0.0`. Two integers compare exactly, even
/// beyond the range an `f64` can hold. Everything else uses JSON equality.
///
/// # Examples
/// ```
/// use vehicle_client::domain::{ErrorCode, VehicleFilter};
///
/// let filter = VehicleFilter::from_pairs([("color", "red")]).expect("one pair");
/// assert_eq!(filter.field().as_str(), "color");
///
/// let err = VehicleFilter::from_pairs(Vec::<(&str, &str)>::new()).expect_err("no pairs");
/// assert_eq!(err.code(), ErrorCode::Precondition);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleFilter {
    field: VehicleField,
    value: Value,
}

impl VehicleFilter {
    /// Build a criterion for a known field.
    pub fn new(field: VehicleField, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Build a criterion from loosely typed field/value pairs.
    ///
    /// # Errors
    ///
    /// Returns a precondition error unless exactly one pair is given and its
    /// field names a vehicle field.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut pairs = pairs.into_iter();
        let (Some((field, value)), None) = (pairs.next(), pairs.next()) else {
            return Err(Error::precondition(
                "filter requires exactly one field/value pair",
            ));
        };
        let field = field
            .as_ref()
            .parse::<VehicleField>()
            .map_err(|err| Error::precondition(err.to_string()))?;
        Ok(Self::new(field, value))
    }

    /// Field being compared.
    pub fn field(&self) -> VehicleField {
        self.field
    }

    /// Value the field must equal.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether `vehicle` satisfies the criterion.
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        vehicle
            .field_value(self.field)
            .is_some_and(|actual| values_match(&actual, &self.value))
    }
}

fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(left), Value::Number(right)) => numbers_match(left, right),
        _ => actual == expected,
    }
}

fn numbers_match(left: &Number, right: &Number) -> bool {
    if left.is_f64() || right.is_f64() {
        return left.as_f64() == right.as_f64();
    }
    match (left.as_i64(), right.as_i64()) {
        (Some(left), Some(right)) => left == right,
        _ => left.as_u64().is_some_and(|left| right.as_u64() == Some(left)),
    }
}
