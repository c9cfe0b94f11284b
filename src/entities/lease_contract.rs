//! Lease contract record, request payload and aggregation shape

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::entity::Entity;

/// Known contract status values
///
/// `status` is stored as a free string; these are the values the rest of the
/// system talks about but nothing rejects others.
pub struct ContractStatus;

impl ContractStatus {
    pub const ACTIVE: &'static str = "ACTIVE";
    pub const COMPLETED: &'static str = "COMPLETED";
    pub const CANCELLED: &'static str = "CANCELLED";

    pub const ALL: [&'static str; 3] = [Self::ACTIVE, Self::COMPLETED, Self::CANCELLED];

    /// Whether `status` is one of the known values
    pub fn is_known(status: &str) -> bool {
        Self::ALL.contains(&status)
    }
}

/// A rental agreement binding a truck to a lessee for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseContract {
    /// Store-assigned identifier
    pub id: Uuid,

    /// Soft reference to `Truck::truck_number`
    pub truck_number: String,

    pub lessee_name: String,
    pub origin_city: String,
    pub destination_city: String,
    pub lease_amount: f64,
    pub start_date: NaiveDate,

    /// Not checked against `start_date`
    pub end_date: NaiveDate,

    /// One of [`ContractStatus::ALL`] by convention only
    pub status: String,
}

impl LeaseContract {
    /// Materialize a payload under the given identifier
    pub fn new(id: Uuid, payload: NewLeaseContract) -> Self {
        Self {
            id,
            truck_number: payload.truck_number,
            lessee_name: payload.lessee_name,
            origin_city: payload.origin_city,
            destination_city: payload.destination_city,
            lease_amount: payload.lease_amount,
            start_date: payload.start_date,
            end_date: payload.end_date,
            status: payload.status,
        }
    }

    /// Whether `lesseeName` or `destinationCity` contains `keyword`
    pub fn matches_keyword(&self, keyword: &regex::Regex) -> bool {
        keyword.is_match(&self.lessee_name) || keyword.is_match(&self.destination_city)
    }
}

impl Entity for LeaseContract {
    fn resource_name() -> &'static str {
        "leaseContracts"
    }

    fn resource_name_singular() -> &'static str {
        "lease_contract"
    }

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Request body for creating or fully replacing a contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaseContract {
    pub truck_number: String,
    pub lessee_name: String,
    pub origin_city: String,
    pub destination_city: String,
    pub lease_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

/// Lease totals grouped by `originCity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginCityTotal {
    pub origin_city: String,
    pub total_lease: f64,
    pub contracts_count: u64,
}
