//! Integration test infrastructure for storage backends.
//!
//! Builds the production router around any pair of services so the REST
//! suite exercises the real handlers, extractors and error mapping.
//!
//! # Architecture
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by build_test_router)
//!         ├─ GET  /health
//!         ├─ /api/trucks/...     → TruckService
//!         └─ /api/contracts/...  → LeaseContractService
//! ```

#[macro_use]
pub mod rest_tests;

use axum::Router;
use fleet::core::service::{LeaseContractService, TruckService};
use fleet::server::ServerBuilder;
use std::sync::Arc;

/// Build the application router with the default `/api` prefix.
pub fn build_test_router(
    trucks: Arc<dyn TruckService>,
    contracts: Arc<dyn LeaseContractService>,
) -> Router {
    ServerBuilder::new()
        .with_services(trucks, contracts)
        .build()
        .expect("router should build")
}
