//! Server host for transport-agnostic API exposure
//!
//! `ServerHost` holds the state every exposure needs: the two injected
//! stores. It knows nothing about HTTP and is shared as `Arc<ServerHost>`
//! router state.

use crate::core::{LeaseContractService, TruckService};
use std::sync::Arc;

/// Host context containing the injected services
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::new(
///     Arc::new(InMemoryTruckService::new()),
///     Arc::new(InMemoryLeaseContractService::new()),
/// );
/// let app = RestExposure::build_router(Arc::new(host), &RestOptions::default());
/// ```
#[derive(Clone)]
pub struct ServerHost {
    /// Store behind `/trucks`
    pub trucks: Arc<dyn TruckService>,

    /// Store behind `/contracts`
    pub contracts: Arc<dyn LeaseContractService>,
}

impl ServerHost {
    pub fn new(
        trucks: Arc<dyn TruckService>,
        contracts: Arc<dyn LeaseContractService>,
    ) -> Self {
        Self { trucks, contracts }
    }
}

impl std::fmt::Debug for ServerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHost").finish_non_exhaustive()
    }
}
