//! Core module containing the traits and types shared by every layer

pub mod entity;
pub mod error;
pub mod extractors;
pub mod query;
pub mod service;

pub use entity::Entity;
pub use error::{FleetError, FleetResult};
pub use query::{PageRequest, SortDirection};
pub use service::{LeaseContractService, TruckService};
