//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::{RestExposure, RestOptions};
use super::host::ServerHost;
use crate::core::{LeaseContractService, TruckService};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Builder for the fleet HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_truck_service(InMemoryTruckService::new())
///     .with_lease_contract_service(InMemoryLeaseContractService::new())
///     .with_api_prefix("/api")
///     .build()?;
/// ```
pub struct ServerBuilder {
    truck_service: Option<Arc<dyn TruckService>>,
    lease_contract_service: Option<Arc<dyn LeaseContractService>>,
    options: RestOptions,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            truck_service: None,
            lease_contract_service: None,
            options: RestOptions::default(),
        }
    }

    /// Set the truck service (required)
    pub fn with_truck_service(mut self, service: impl TruckService + 'static) -> Self {
        self.truck_service = Some(Arc::new(service));
        self
    }

    /// Set the lease contract service (required)
    pub fn with_lease_contract_service(
        mut self,
        service: impl LeaseContractService + 'static,
    ) -> Self {
        self.lease_contract_service = Some(Arc::new(service));
        self
    }

    /// Set both services from already shared handles
    pub fn with_services(
        mut self,
        trucks: Arc<dyn TruckService>,
        contracts: Arc<dyn LeaseContractService>,
    ) -> Self {
        self.truck_service = Some(trucks);
        self.lease_contract_service = Some(contracts);
        self
    }

    /// Prefix for the resource routes (default `/api`)
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.api_prefix = prefix.into();
        self
    }

    /// Per-request timeout (default 30s)
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.options.request_timeout = timeout;
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(&mut self) -> Result<ServerHost> {
        let trucks = self.truck_service.take().ok_or_else(|| {
            anyhow::anyhow!("TruckService is required. Call .with_truck_service()")
        })?;
        let contracts = self.lease_contract_service.take().ok_or_else(|| {
            anyhow::anyhow!(
                "LeaseContractService is required. Call .with_lease_contract_service()"
            )
        })?;

        Ok(ServerHost::new(trucks, contracts))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, &self.options)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and serves until SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
