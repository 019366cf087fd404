//! Core record types for fleetdesk.
//!
//! These are the shapes persisted as JSON under the storage keys, so field
//! names follow the stored camelCase form.

use serde::{Deserialize, Serialize, Serializer};

/// A registered account.
///
/// Passwords are kept in plain text; this tool makes no security claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Sequential id (`count + 1` at registration time).
    pub id: i64,
    /// Unique, case-sensitive login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl User {
    /// The built-in administrator account seeded into an empty user list.
    #[must_use]
    pub fn default_admin(username: &str, password: &str) -> Self {
        Self {
            id: 1,
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Rental state of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Can be rented.
    Available,
    /// Currently out with a customer.
    Rented,
    /// Off the rental line.
    Unavailable,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Rented => write!(f, "rented"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// A vehicle in the rental fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Record id. Seeded vehicles use small integers, added ones a millisecond timestamp.
    pub id: i64,
    /// License plate text as entered.
    pub plate_number: String,
    /// Manufacturer name.
    pub brand: String,
    /// Daily rental price. Sign is not checked.
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    /// Current rental state.
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Build a vehicle record.
    #[must_use]
    pub fn new(
        id: i64,
        plate_number: impl Into<String>,
        brand: impl Into<String>,
        price: f64,
        status: VehicleStatus,
    ) -> Self {
        Self {
            id,
            plate_number: plate_number.into(),
            brand: brand.into(),
            price,
            status,
        }
    }
}

/// Whole prices are written as JSON integers (`300`, not `300.0`).
#[allow(
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::trivially_copy_pass_by_ref
)]
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53: above this not every integer is representable
    if price.fract() == 0.0 && price.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// The four vehicles written to an empty fleet on first run.
#[must_use]
pub fn default_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::new(1, "京A12345", "丰田", 300.0, VehicleStatus::Available),
        Vehicle::new(2, "京B67890", "本田", 280.0, VehicleStatus::Rented),
        Vehicle::new(3, "京C11111", "大众", 260.0, VehicleStatus::Available),
        Vehicle::new(4, "京D22222", "奔驰", 500.0, VehicleStatus::Rented),
    ]
}

/// Fields supplied when adding a vehicle.
///
/// `id` is normally left empty and generated; a supplied id overrides the
/// generated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    /// Explicit id, if the caller wants one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// License plate text.
    pub plate_number: String,
    /// Manufacturer name.
    pub brand: String,
    /// Daily rental price.
    pub price: f64,
    /// Initial rental state.
    pub status: VehicleStatus,
}

impl NewVehicle {
    /// Merge these fields over `generated_id`.
    #[must_use]
    pub fn into_vehicle(self, generated_id: i64) -> Vehicle {
        Vehicle {
            id: self.id.unwrap_or(generated_id),
            plate_number: self.plate_number,
            brand: self.brand,
            price: self.price,
            status: self.status,
        }
    }
}

/// A partial update. `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehiclePatch {
    /// New plate number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_number: Option<String>,
    /// New brand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// New price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
}

impl VehiclePatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: VehicleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Check whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plate_number.is_none()
            && self.brand.is_none()
            && self.price.is_none()
            && self.status.is_none()
    }

    /// Shallow-merge the patch over `vehicle`.
    pub fn apply(&self, vehicle: &mut Vehicle) {
        if let Some(plate_number) = &self.plate_number {
            vehicle.plate_number.clone_from(plate_number);
        }
        if let Some(brand) = &self.brand {
            vehicle.brand.clone_from(brand);
        }
        if let Some(price) = self.price {
            vehicle.price = price;
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
    }
}

/// Filters for a fleet search. Every present filter must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Case-insensitive substring of the plate number. Empty matches all.
    pub plate_number: Option<String>,
    /// Case-insensitive substring of the brand. Empty matches all.
    pub brand: Option<String>,
    /// Exact status.
    pub status: Option<VehicleStatus>,
}

impl SearchCriteria {
    /// Check whether `vehicle` satisfies every filter.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        contains_ignore_case(&vehicle.plate_number, self.plate_number.as_deref())
            && contains_ignore_case(&vehicle.brand, self.brand.as_deref())
            && self.status.map_or(true, |status| vehicle.status == status)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
