//! `fleet-server`: serves the truck and lease contract API
//!
//! ```bash
//! FLEET_STORAGE=mongodb MONGODB_URI=mongodb://localhost:27017 cargo run --features mongodb_backend
//! ```

use anyhow::Result;
use fleet::config::{ServerConfig, StorageKind};
use fleet::server::ServerBuilder;
use fleet::storage::{InMemoryLeaseContractService, InMemoryTruckService};
use fleet::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::load()?;
    tracing::info!(
        storage = ?config.storage,
        api_prefix = %config.api_prefix,
        "starting fleet-server"
    );

    let builder = ServerBuilder::new()
        .with_api_prefix(config.api_prefix.clone())
        .with_request_timeout(config.request_timeout());

    let builder = match config.storage {
        StorageKind::InMemory => builder
            .with_truck_service(InMemoryTruckService::new())
            .with_lease_contract_service(InMemoryLeaseContractService::new()),
        StorageKind::Mongodb => with_mongodb(builder, &config).await?,
    };

    builder.serve(&config.bind_address()).await
}

#[cfg(feature = "mongodb_backend")]
async fn with_mongodb(builder: ServerBuilder, config: &ServerConfig) -> Result<ServerBuilder> {
    use fleet::storage::{MongoLeaseContractService, MongoTruckService};
    use mongodb::Client;

    let client = Client::with_uri_str(&config.mongodb.uri).await?;
    let database = client.database(&config.mongodb.database);

    let trucks = MongoTruckService::new(database.clone());
    let contracts = MongoLeaseContractService::new(database);
    trucks.ensure_indexes().await?;
    contracts.ensure_indexes().await?;

    tracing::info!(database = %config.mongodb.database, "connected to MongoDB");

    Ok(builder
        .with_truck_service(trucks)
        .with_lease_contract_service(contracts))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn with_mongodb(_builder: ServerBuilder, _config: &ServerConfig) -> Result<ServerBuilder> {
    anyhow::bail!("storage 'mongodb' requires building with the `mongodb_backend` feature")
}
