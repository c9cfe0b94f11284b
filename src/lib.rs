//! # Fleet Lease
//!
//! REST backend for a truck fleet and the lease contracts written against it.
//!
//! ## Features
//!
//! - **Two resource groups**: `/trucks` and `/contracts`, each with CRUD,
//!   filters, keyword search and partial updates
//! - **Aggregations**: trucks grouped by city, lease totals by origin city
//! - **Pluggable storage**: insertion-ordered in-memory store by default,
//!   MongoDB behind the `mongodb_backend` feature
//! - **Uniform errors**: every failure is a JSON `{code, message, details}`
//!   body with a matching status code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fleet::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_truck_service(InMemoryTruckService::new())
//!         .with_lease_contract_service(InMemoryLeaseContractService::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::Entity,
        error::{FleetError, FleetResult},
        query::{PageRequest, SortDirection},
        service::{LeaseContractService, TruckService},
    };

    // === Entities ===
    pub use crate::entities::{
        CityGroup, ContractStatus, LeaseContract, NewLeaseContract, NewTruck, OriginCityTotal,
        Truck, TruckSummary,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryLeaseContractService, InMemoryTruckService};
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::{MongoLeaseContractService, MongoTruckService};

    // === Config ===
    pub use crate::config::{MongoConfig, ServerConfig, StorageKind};

    // === Server ===
    pub use crate::server::{RestExposure, RestOptions, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use uuid::Uuid;
}
