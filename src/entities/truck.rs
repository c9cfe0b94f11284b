//! Truck record, request payload, projection and grouping shapes

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::entity::Entity;

/// A fleet vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Business key used by callers for partial updates
    pub truck_number: String,

    /// Free-form category (Flatbed, Refrigerated, Container, ...)
    #[serde(rename = "type")]
    pub truck_type: String,

    pub capacity_tons: f64,
    pub owner_company: String,
    pub current_city: String,
    pub available: bool,
}

impl Truck {
    /// Materialize a payload under a freshly assigned identifier
    pub fn new(id: Uuid, payload: NewTruck) -> Self {
        Self {
            id,
            truck_number: payload.truck_number,
            truck_type: payload.truck_type,
            capacity_tons: payload.capacity_tons,
            owner_company: payload.owner_company,
            current_city: payload.current_city,
            available: payload.available,
        }
    }

    /// Whether `truckNumber` or `type` contains `keyword`, ignoring case
    pub fn matches_keyword(&self, keyword: &regex::Regex) -> bool {
        keyword.is_match(&self.truck_number) || keyword.is_match(&self.truck_type)
    }
}

impl Entity for Truck {
    fn resource_name() -> &'static str {
        "trucks"
    }

    fn resource_name_singular() -> &'static str {
        "truck"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Request body for creating a truck
///
/// There is no `id` field: an identifier sent by the caller is ignored and
/// the store assigns its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTruck {
    pub truck_number: String,
    #[serde(rename = "type")]
    pub truck_type: String,
    pub capacity_tons: f64,
    pub owner_company: String,
    pub current_city: String,
    pub available: bool,
}

/// Projection of a truck restricted to `truckNumber`, `type` and `available`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckSummary {
    pub truck_number: String,
    #[serde(rename = "type")]
    pub truck_type: String,
    pub available: bool,
}

impl From<&Truck> for TruckSummary {
    fn from(truck: &Truck) -> Self {
        Self {
            truck_number: truck.truck_number.clone(),
            truck_type: truck.truck_type.clone(),
            available: truck.available,
        }
    }
}

/// Trucks grouped by `currentCity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityGroup {
    pub city: String,
    pub truck_count: u64,
    pub total_capacity: f64,
}
