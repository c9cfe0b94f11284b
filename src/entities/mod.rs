//! Records managed by the fleet backend
//!
//! - [`Truck`]: a fleet vehicle, addressed by id or by its `truckNumber`
//! - [`LeaseContract`]: a rental agreement referring to a truck by `truckNumber`
//!
//! The `truckNumber` on a contract is a soft reference: nothing checks that a
//! matching truck exists, and deleting a truck leaves its contracts alone.

pub mod lease_contract;
pub mod truck;

pub use lease_contract::{ContractStatus, LeaseContract, NewLeaseContract, OriginCityTotal};
pub use truck::{CityGroup, NewTruck, Truck, TruckSummary};
