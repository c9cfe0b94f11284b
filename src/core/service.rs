//! Service traits for the two resource stores
//!
//! Every method maps to a single query against the backing collection. The
//! traits are object safe so the HTTP layer holds them as `Arc<dyn ...>` and
//! stays agnostic of the storage backend.

use crate::core::query::{PageRequest, SortDirection};
use crate::entities::{
    CityGroup, LeaseContract, NewLeaseContract, NewTruck, OriginCityTotal, Truck, TruckSummary,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Store for [`Truck`] records
///
/// Natural order is insertion order. Partial updates are matched by
/// `truckNumber` and only touch the first record in natural order; they
/// return whether anything matched.
#[async_trait]
pub trait TruckService: Send + Sync {
    /// Persist a new truck under a fresh identifier
    async fn create(&self, truck: NewTruck) -> Result<Truck>;

    /// All trucks in natural order
    async fn list(&self) -> Result<Vec<Truck>>;

    /// Point lookup by identifier
    async fn get(&self, id: &Uuid) -> Result<Option<Truck>>;

    /// Remove by identifier; absent ids are not an error
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Trucks with `available == true` and `currentCity == city`
    async fn find_available(&self, city: &str) -> Result<Vec<Truck>>;

    /// Trucks whose `truckNumber` or `type` contains `keyword`, ignoring case
    async fn search(&self, keyword: &str) -> Result<Vec<Truck>>;

    /// All trucks ordered by `capacityTons`, ties kept in natural order
    async fn sort_by_capacity(&self, direction: SortDirection) -> Result<Vec<Truck>>;

    /// One page of trucks in natural order
    async fn paginate(&self, page: PageRequest) -> Result<Vec<Truck>>;

    /// All trucks reduced to `truckNumber`, `type` and `available`
    async fn projected(&self) -> Result<Vec<TruckSummary>>;

    /// Trucks with `capacityTons` strictly greater than `min_tons`
    async fn above_capacity(&self, min_tons: f64) -> Result<Vec<Truck>>;

    /// Set `currentCity` on the first truck with this `truckNumber`
    async fn update_city(&self, truck_number: &str, city: &str) -> Result<bool>;

    /// Set `available` on the first truck with this `truckNumber`
    async fn update_availability(&self, truck_number: &str, available: bool) -> Result<bool>;

    /// Count and total capacity per `currentCity`, ordered by city
    async fn group_by_city(&self) -> Result<Vec<CityGroup>>;
}

/// Store for [`LeaseContract`] records
///
/// Partial updates are matched by identifier and return whether the
/// contract exists. No status or amount validation happens here.
#[async_trait]
pub trait LeaseContractService: Send + Sync {
    /// Persist a new contract under a fresh identifier
    async fn create(&self, contract: NewLeaseContract) -> Result<LeaseContract>;

    /// All contracts in natural order
    async fn list(&self) -> Result<Vec<LeaseContract>>;

    /// Point lookup by identifier
    async fn get(&self, id: &Uuid) -> Result<Option<LeaseContract>>;

    /// Replace every field of an existing contract; `id` always wins over
    /// anything the caller put in the payload
    async fn update(&self, id: &Uuid, contract: NewLeaseContract)
    -> Result<Option<LeaseContract>>;

    /// Remove by identifier; absent ids are not an error
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Contracts whose `status` equals `status` exactly
    async fn find_by_status(&self, status: &str) -> Result<Vec<LeaseContract>>;

    /// Contracts whose `lesseeName` or `destinationCity` contains `keyword`,
    /// ignoring case
    async fn search(&self, keyword: &str) -> Result<Vec<LeaseContract>>;

    /// Set `status` without checking it against the known values
    async fn update_status(&self, id: &Uuid, status: &str) -> Result<bool>;

    /// Set `leaseAmount` without checking its sign
    async fn update_amount(&self, id: &Uuid, amount: f64) -> Result<bool>;

    /// Sum of `leaseAmount` and count per `originCity`, ordered by city
    async fn total_lease_by_origin_city(&self) -> Result<Vec<OriginCityTotal>>;

    /// Set `status` to `ACTIVE` whatever it was before
    async fn activate(&self, id: &Uuid) -> Result<bool>;
}
