//! In-memory implementations of the store traits for testing and development
//!
//! Records live in an insertion-ordered map so "natural order" is stable and
//! matches what a document store returns for an unsorted scan of a freshly
//! written collection. Each operation takes the lock once, which gives the
//! same per-document atomicity a document store offers and nothing more:
//! concurrent partial updates are last-write-wins.

use crate::core::query::{PageRequest, SortDirection, keyword_pattern};
use crate::core::{LeaseContractService, TruckService};
use crate::entities::{
    CityGroup, ContractStatus, LeaseContract, NewLeaseContract, NewTruck, OriginCityTotal, Truck,
    TruckSummary,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type Collection<T> = Arc<RwLock<IndexMap<Uuid, T>>>;

fn read<T>(collection: &Collection<T>) -> Result<RwLockReadGuard<'_, IndexMap<Uuid, T>>> {
    collection
        .read()
        .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
}

fn write<T>(collection: &Collection<T>) -> Result<RwLockWriteGuard<'_, IndexMap<Uuid, T>>> {
    collection
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
}

// ---------------------------------------------------------------------------
// InMemoryTruckService
// ---------------------------------------------------------------------------

/// In-memory truck store
///
/// Cloning shares the underlying collection.
#[derive(Clone)]
pub struct InMemoryTruckService {
    trucks: Collection<Truck>,
}

impl InMemoryTruckService {
    /// Create an empty truck store
    pub fn new() -> Self {
        Self {
            trucks: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    fn filtered(&self, predicate: impl Fn(&Truck) -> bool) -> Result<Vec<Truck>> {
        let trucks = read(&self.trucks)?;
        Ok(trucks.values().filter(|t| predicate(t)).cloned().collect())
    }

    fn update_first(&self, truck_number: &str, apply: impl FnOnce(&mut Truck)) -> Result<bool> {
        let mut trucks = write(&self.trucks)?;
        match trucks
            .values_mut()
            .find(|t| t.truck_number == truck_number)
        {
            Some(truck) => {
                apply(truck);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for InMemoryTruckService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TruckService for InMemoryTruckService {
    async fn create(&self, truck: NewTruck) -> Result<Truck> {
        let truck = Truck::new(Uuid::new_v4(), truck);
        write(&self.trucks)?.insert(truck.id, truck.clone());

        tracing::info!(id = %truck.id, truck_number = %truck.truck_number, "truck created");
        Ok(truck)
    }

    async fn list(&self) -> Result<Vec<Truck>> {
        self.filtered(|_| true)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Truck>> {
        Ok(read(&self.trucks)?.get(id).cloned())
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let removed = write(&self.trucks)?.shift_remove(id);
        tracing::info!(%id, existed = removed.is_some(), "truck deleted");
        Ok(())
    }

    async fn find_available(&self, city: &str) -> Result<Vec<Truck>> {
        tracing::debug!(city, "finding available trucks");
        self.filtered(|t| t.available && t.current_city == city)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Truck>> {
        tracing::debug!(keyword, "searching trucks");
        let pattern = keyword_pattern(keyword)
            .map_err(|e| anyhow!("Invalid search keyword '{}': {}", keyword, e))?;
        self.filtered(|t| t.matches_keyword(&pattern))
    }

    async fn sort_by_capacity(&self, direction: SortDirection) -> Result<Vec<Truck>> {
        let mut trucks = self.filtered(|_| true)?;
        match direction {
            SortDirection::Ascending => {
                trucks.sort_by(|a, b| a.capacity_tons.total_cmp(&b.capacity_tons))
            }
            SortDirection::Descending => {
                trucks.sort_by(|a, b| b.capacity_tons.total_cmp(&a.capacity_tons))
            }
        }
        Ok(trucks)
    }

    async fn paginate(&self, page: PageRequest) -> Result<Vec<Truck>> {
        let trucks = read(&self.trucks)?;
        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);
        Ok(trucks.values().skip(skip).take(size).cloned().collect())
    }

    async fn projected(&self) -> Result<Vec<TruckSummary>> {
        let trucks = read(&self.trucks)?;
        Ok(trucks.values().map(TruckSummary::from).collect())
    }

    async fn above_capacity(&self, min_tons: f64) -> Result<Vec<Truck>> {
        self.filtered(|t| t.capacity_tons > min_tons)
    }

    async fn update_city(&self, truck_number: &str, city: &str) -> Result<bool> {
        let matched = self.update_first(truck_number, |t| t.current_city = city.to_string())?;
        tracing::info!(truck_number, city, matched, "truck city updated");
        Ok(matched)
    }

    async fn update_availability(&self, truck_number: &str, available: bool) -> Result<bool> {
        let matched = self.update_first(truck_number, |t| t.available = available)?;
        tracing::info!(truck_number, available, matched, "truck availability updated");
        Ok(matched)
    }

    async fn group_by_city(&self) -> Result<Vec<CityGroup>> {
        let trucks = read(&self.trucks)?;
        let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
        for truck in trucks.values() {
            let entry = groups.entry(truck.current_city.as_str()).or_default();
            entry.0 += 1;
            entry.1 += truck.capacity_tons;
        }

        Ok(groups
            .into_iter()
            .map(|(city, (truck_count, total_capacity))| CityGroup {
                city: city.to_string(),
                truck_count,
                total_capacity,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// InMemoryLeaseContractService
// ---------------------------------------------------------------------------

/// In-memory lease contract store
#[derive(Clone)]
pub struct InMemoryLeaseContractService {
    contracts: Collection<LeaseContract>,
}

impl InMemoryLeaseContractService {
    /// Create an empty contract store
    pub fn new() -> Self {
        Self {
            contracts: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    fn filtered(&self, predicate: impl Fn(&LeaseContract) -> bool) -> Result<Vec<LeaseContract>> {
        let contracts = read(&self.contracts)?;
        Ok(contracts.values().filter(|c| predicate(c)).cloned().collect())
    }

    fn update_one(&self, id: &Uuid, apply: impl FnOnce(&mut LeaseContract)) -> Result<bool> {
        let mut contracts = write(&self.contracts)?;
        match contracts.get_mut(id) {
            Some(contract) => {
                apply(contract);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for InMemoryLeaseContractService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaseContractService for InMemoryLeaseContractService {
    async fn create(&self, contract: NewLeaseContract) -> Result<LeaseContract> {
        let contract = LeaseContract::new(Uuid::new_v4(), contract);
        write(&self.contracts)?.insert(contract.id, contract.clone());

        tracing::info!(id = %contract.id, truck_number = %contract.truck_number, "lease contract created");
        Ok(contract)
    }

    async fn list(&self) -> Result<Vec<LeaseContract>> {
        self.filtered(|_| true)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<LeaseContract>> {
        Ok(read(&self.contracts)?.get(id).cloned())
    }

    async fn update(
        &self,
        id: &Uuid,
        contract: NewLeaseContract,
    ) -> Result<Option<LeaseContract>> {
        let mut contracts = write(&self.contracts)?;
        let Some(slot) = contracts.get_mut(id) else {
            return Ok(None);
        };
        *slot = LeaseContract::new(*id, contract);

        tracing::info!(%id, "lease contract replaced");
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let removed = write(&self.contracts)?.shift_remove(id);
        tracing::info!(%id, existed = removed.is_some(), "lease contract deleted");
        Ok(())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<LeaseContract>> {
        tracing::debug!(status, "finding lease contracts by status");
        self.filtered(|c| c.status == status)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<LeaseContract>> {
        tracing::debug!(keyword, "searching lease contracts");
        let pattern = keyword_pattern(keyword)
            .map_err(|e| anyhow!("Invalid search keyword '{}': {}", keyword, e))?;
        self.filtered(|c| c.matches_keyword(&pattern))
    }

    async fn update_status(&self, id: &Uuid, status: &str) -> Result<bool> {
        let matched = self.update_one(id, |c| c.status = status.to_string())?;
        tracing::info!(%id, status, matched, "lease contract status updated");
        Ok(matched)
    }

    async fn update_amount(&self, id: &Uuid, amount: f64) -> Result<bool> {
        let matched = self.update_one(id, |c| c.lease_amount = amount)?;
        tracing::info!(%id, amount, matched, "lease contract amount updated");
        Ok(matched)
    }

    async fn total_lease_by_origin_city(&self) -> Result<Vec<OriginCityTotal>> {
        let contracts = read(&self.contracts)?;
        let mut totals: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
        for contract in contracts.values() {
            let entry = totals.entry(contract.origin_city.as_str()).or_default();
            entry.0 += contract.lease_amount;
            entry.1 += 1;
        }

        Ok(totals
            .into_iter()
            .map(|(city, (total_lease, contracts_count))| OriginCityTotal {
                origin_city: city.to_string(),
                total_lease,
                contracts_count,
            })
            .collect())
    }

    async fn activate(&self, id: &Uuid) -> Result<bool> {
        let matched = self.update_one(id, |c| c.status = ContractStatus::ACTIVE.to_string())?;
        tracing::info!(%id, matched, "lease contract activated");
        Ok(matched)
    }
}
