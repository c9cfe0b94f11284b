//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoTruckService` and `MongoLeaseContractService`, both backed by
//! a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! fleet-lease = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One collection per record type, named by `Entity::resource_name()`:
//! `trucks` and `leaseContracts`. Every operation is a single driver call
//! (find, update-one, replace-one, delete-one or an aggregate pipeline), so
//! atomicity is exactly MongoDB's per-document atomicity.
//!
//! # Natural order
//!
//! Every document carries an `_seq` field taken from a per-collection counter
//! in the `counters` collection at insert time. Reads sort on it, and the
//! capacity sort uses it as the secondary key, so results come back in
//! insertion order and ties keep that order. `_seq` never reaches the records.
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and dates are therefore stored as
//! strings. The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::query::{PageRequest, SortDirection, escape_keyword};
use crate::core::{LeaseContractService, TruckService};
use crate::entities::{
    CityGroup, ContractStatus, LeaseContract, NewLeaseContract, NewTruck, OriginCityTotal, Truck,
    TruckSummary,
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use mongodb::{Cursor, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

const BACKEND: &str = "MongoDB";

const COUNTERS_COLLECTION: &str = "counters";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json).map_err(|e| data_error("convert JSON to BSON", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(anyhow::Error::new(StorageError::DataError {
                backend: BACKEND.to_string(),
                message: "Expected BSON document, got non-object".to_string(),
            }));
        }
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id`.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    let json = serde_json::to_value(record).map_err(|e| data_error("serialize record", e))?;
    json_to_document(json)
}

fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| data_error("deserialize record from document", e))
}

async fn collect<T: DeserializeOwned>(cursor: Cursor<Document>, operation: &str) -> Result<Vec<T>> {
    let docs: Vec<Document> = cursor
        .try_collect()
        .await
        .map_err(|e| storage_error(operation, e))?;

    docs.into_iter().map(from_document).collect()
}

/// Wrap a driver error into a categorized [`StorageError`]
///
/// Server selection and I/O failures mean the database is unreachable; the
/// rest are query failures.
fn storage_error(operation: &str, err: mongodb::error::Error) -> anyhow::Error {
    let message = format!("Failed to {}: {}", operation, err);
    tracing::error!(backend = BACKEND, operation, error = %err, "storage operation failed");

    let storage = match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(..) => StorageError::Unavailable {
            backend: BACKEND.to_string(),
            message,
        },
        _ => StorageError::QueryError {
            backend: BACKEND.to_string(),
            message,
        },
    };
    anyhow::Error::new(storage)
}

fn data_error(operation: &str, err: impl std::fmt::Display) -> anyhow::Error {
    anyhow::Error::new(StorageError::DataError {
        backend: BACKEND.to_string(),
        message: format!("Failed to {}: {}", operation, err),
    })
}

// ---------------------------------------------------------------------------
// Query builders
// ---------------------------------------------------------------------------

/// `$or` of case-insensitive literal matches of `keyword` on each field
fn keyword_filter(fields: &[&str], keyword: &str) -> Document {
    let pattern = escape_keyword(keyword);
    let clauses: Vec<Bson> = fields
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(*field, doc! { "$regex": pattern.as_str(), "$options": "i" });
            Bson::Document(clause)
        })
        .collect();
    doc! { "$or": clauses }
}

/// `$group` by `key`, then sort by group key and expose it as `key_alias`
fn group_pipeline(key: &str, key_alias: &str, accumulators: Document) -> Vec<Document> {
    let mut group = doc! { "_id": format!("${}", key) };
    let mut project = doc! { "_id": 0 };
    project.insert(key_alias, "$_id");
    for (name, accumulator) in accumulators {
        project.insert(name.as_str(), 1);
        group.insert(name, accumulator);
    }

    vec![
        doc! { "$group": group },
        doc! { "$sort": { "_id": 1 } },
        doc! { "$project": project },
    ]
}

fn natural_order() -> Document {
    doc! { "_seq": 1 }
}

/// Next insertion sequence for `counter`, created on first use
async fn next_seq(database: &Database, counter: &str) -> Result<i64> {
    let counter_doc = database
        .collection::<Document>(COUNTERS_COLLECTION)
        .find_one_and_update(doc! { "_id": counter }, doc! { "$inc": { "seq": 1_i64 } })
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await
        .map_err(|e| storage_error("allocate insertion sequence", e))?
        .ok_or_else(|| anyhow!("sequence counter '{}' missing after upsert", counter))?;

    counter_doc
        .get_i64("seq")
        .map_err(|e| data_error("read insertion sequence", e))
}

/// Record document with its insertion sequence attached
async fn sequenced<T: Entity + Serialize>(database: &Database, record: &T) -> Result<Document> {
    let mut document = to_document(record)?;
    document.insert("_seq", next_seq(database, T::resource_name()).await?);
    Ok(document)
}

fn set(field: &str, value: impl Into<Bson>) -> Document {
    let mut fields = Document::new();
    fields.insert(field, value.into());
    doc! { "$set": fields }
}

// ---------------------------------------------------------------------------
// MongoTruckService
// ---------------------------------------------------------------------------

/// Truck store backed by the `trucks` collection.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use fleet::storage::MongoTruckService;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let service = MongoTruckService::new(client.database("fleet"));
/// service.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoTruckService {
    database: Database,
}

impl MongoTruckService {
    /// Create a new `MongoTruckService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(Truck::resource_name())
    }

    /// Create the indexes backing the lookup and filter routes.
    ///
    /// - `truckNumber: 1` — partial updates by business key
    /// - `currentCity: 1, available: 1` — availability filter
    /// - `capacityTons: 1` — capacity sort and threshold filter
    /// - `_seq: 1` — natural order
    ///
    /// Idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "truckNumber": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "currentCity": 1, "available": 1 })
                .build(),
            IndexModel::builder().keys(doc! { "capacityTons": 1 }).build(),
            IndexModel::builder().keys(natural_order()).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| storage_error("create indexes on trucks collection", e))?;

        Ok(())
    }

    async fn find(&self, filter: Document, operation: &str) -> Result<Vec<Truck>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(natural_order())
            .await
            .map_err(|e| storage_error(operation, e))?;
        collect(cursor, operation).await
    }

    /// Apply `update` to the first truck with this number in natural order
    async fn update_by_number(&self, truck_number: &str, update: Document) -> Result<bool> {
        let before = self
            .collection()
            .find_one_and_update(doc! { "truckNumber": truck_number }, update)
            .sort(natural_order())
            .await
            .map_err(|e| storage_error("update truck", e))?;
        Ok(before.is_some())
    }
}

#[async_trait]
impl TruckService for MongoTruckService {
    /// Insert the truck and read it back to return the stored version.
    async fn create(&self, truck: NewTruck) -> Result<Truck> {
        let truck = Truck::new(Uuid::new_v4(), truck);
        let id_bson = uuid_bson(&truck.id);

        self.collection()
            .insert_one(sequenced(&self.database, &truck).await?)
            .await
            .map_err(|e| storage_error("create truck", e))?;

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| storage_error("read back created truck", e))?
            .ok_or_else(|| anyhow!("Truck not found after insert"))?;

        tracing::info!(id = %truck.id, truck_number = %truck.truck_number, "truck created");
        from_document(stored)
    }

    async fn list(&self) -> Result<Vec<Truck>> {
        self.find(doc! {}, "list trucks").await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Truck>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| storage_error("get truck", e))?;

        doc.map(from_document).transpose()
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| storage_error("delete truck", e))?;

        tracing::info!(%id, existed = result.deleted_count > 0, "truck deleted");
        Ok(())
    }

    async fn find_available(&self, city: &str) -> Result<Vec<Truck>> {
        tracing::debug!(city, "finding available trucks");
        self.find(
            doc! { "available": true, "currentCity": city },
            "find available trucks",
        )
        .await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Truck>> {
        tracing::debug!(keyword, "searching trucks");
        self.find(
            keyword_filter(&["truckNumber", "type"], keyword),
            "search trucks",
        )
        .await
    }

    async fn sort_by_capacity(&self, direction: SortDirection) -> Result<Vec<Truck>> {
        let cursor = self
            .collection()
            .find(doc! {})
            .sort(doc! { "capacityTons": direction.as_order(), "_seq": 1 })
            .await
            .map_err(|e| storage_error("sort trucks", e))?;
        collect(cursor, "sort trucks").await
    }

    async fn paginate(&self, page: PageRequest) -> Result<Vec<Truck>> {
        // the server only accepts a signed 64-bit skip
        if i64::try_from(page.skip()).is_err() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .find(doc! {})
            .sort(natural_order())
            .skip(page.skip())
            .limit(i64::try_from(page.size()).unwrap_or(i64::MAX))
            .await
            .map_err(|e| storage_error("paginate trucks", e))?;
        collect(cursor, "paginate trucks").await
    }

    async fn projected(&self) -> Result<Vec<TruckSummary>> {
        let cursor = self
            .collection()
            .find(doc! {})
            .sort(natural_order())
            .projection(doc! { "_id": 0, "truckNumber": 1, "type": 1, "available": 1 })
            .await
            .map_err(|e| storage_error("project trucks", e))?;
        collect(cursor, "project trucks").await
    }

    async fn above_capacity(&self, min_tons: f64) -> Result<Vec<Truck>> {
        self.find(
            doc! { "capacityTons": { "$gt": min_tons } },
            "find trucks above capacity",
        )
        .await
    }

    async fn update_city(&self, truck_number: &str, city: &str) -> Result<bool> {
        let matched = self
            .update_by_number(truck_number, set("currentCity", city))
            .await?;
        tracing::info!(truck_number, city, matched, "truck city updated");
        Ok(matched)
    }

    async fn update_availability(&self, truck_number: &str, available: bool) -> Result<bool> {
        let matched = self
            .update_by_number(truck_number, set("available", available))
            .await?;
        tracing::info!(truck_number, available, matched, "truck availability updated");
        Ok(matched)
    }

    async fn group_by_city(&self) -> Result<Vec<CityGroup>> {
        let pipeline = group_pipeline(
            "currentCity",
            "city",
            doc! {
                "truckCount": { "$sum": 1 },
                "totalCapacity": { "$sum": "$capacityTons" },
            },
        );

        let cursor = self
            .collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| storage_error("group trucks by city", e))?;
        collect(cursor, "group trucks by city").await
    }
}

// ---------------------------------------------------------------------------
// MongoLeaseContractService
// ---------------------------------------------------------------------------

/// Lease contract store backed by the `leaseContracts` collection.
#[derive(Clone, Debug)]
pub struct MongoLeaseContractService {
    database: Database,
}

impl MongoLeaseContractService {
    /// Create a new `MongoLeaseContractService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(LeaseContract::resource_name())
    }

    /// Create the indexes backing the status filter and origin grouping.
    ///
    /// Idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "status": 1 }).build(),
            IndexModel::builder().keys(doc! { "originCity": 1 }).build(),
            IndexModel::builder().keys(natural_order()).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| storage_error("create indexes on leaseContracts collection", e))?;

        Ok(())
    }

    async fn find(&self, filter: Document, operation: &str) -> Result<Vec<LeaseContract>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(natural_order())
            .await
            .map_err(|e| storage_error(operation, e))?;
        collect(cursor, operation).await
    }

    async fn update_by_id(&self, id: &Uuid, update: Document) -> Result<bool> {
        let result = self
            .collection()
            .update_one(doc! { "_id": uuid_bson(id) }, update)
            .await
            .map_err(|e| storage_error("update lease contract", e))?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl LeaseContractService for MongoLeaseContractService {
    async fn create(&self, contract: NewLeaseContract) -> Result<LeaseContract> {
        let contract = LeaseContract::new(Uuid::new_v4(), contract);
        let id_bson = uuid_bson(&contract.id);

        self.collection()
            .insert_one(sequenced(&self.database, &contract).await?)
            .await
            .map_err(|e| storage_error("create lease contract", e))?;

        let stored = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| storage_error("read back created lease contract", e))?
            .ok_or_else(|| anyhow!("Lease contract not found after insert"))?;

        tracing::info!(id = %contract.id, truck_number = %contract.truck_number, "lease contract created");
        from_document(stored)
    }

    async fn list(&self) -> Result<Vec<LeaseContract>> {
        self.find(doc! {}, "list lease contracts").await
    }

    async fn get(&self, id: &Uuid) -> Result<Option<LeaseContract>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| storage_error("get lease contract", e))?;

        doc.map(from_document).transpose()
    }

    /// Overwrite every record field, keeping `_id` and `_seq`;
    /// `matched_count == 0` means no such contract.
    async fn update(
        &self,
        id: &Uuid,
        contract: NewLeaseContract,
    ) -> Result<Option<LeaseContract>> {
        let contract = LeaseContract::new(*id, contract);
        let id_bson = uuid_bson(id);

        let mut fields = to_document(&contract)?;
        fields.remove("_id");

        let result = self
            .collection()
            .update_one(doc! { "_id": &id_bson }, doc! { "$set": fields })
            .await
            .map_err(|e| storage_error("replace lease contract", e))?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        let updated = self
            .collection()
            .find_one(doc! { "_id": id_bson })
            .await
            .map_err(|e| storage_error("read back replaced lease contract", e))?;

        tracing::info!(%id, "lease contract replaced");
        updated.map(from_document).transpose()
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| storage_error("delete lease contract", e))?;

        tracing::info!(%id, existed = result.deleted_count > 0, "lease contract deleted");
        Ok(())
    }

    async fn find_by_status(&self, status: &str) -> Result<Vec<LeaseContract>> {
        tracing::debug!(status, "finding lease contracts by status");
        self.find(doc! { "status": status }, "find lease contracts by status")
            .await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<LeaseContract>> {
        tracing::debug!(keyword, "searching lease contracts");
        self.find(
            keyword_filter(&["lesseeName", "destinationCity"], keyword),
            "search lease contracts",
        )
        .await
    }

    async fn update_status(&self, id: &Uuid, status: &str) -> Result<bool> {
        let matched = self.update_by_id(id, set("status", status)).await?;
        tracing::info!(%id, status, matched, "lease contract status updated");
        Ok(matched)
    }

    async fn update_amount(&self, id: &Uuid, amount: f64) -> Result<bool> {
        let matched = self.update_by_id(id, set("leaseAmount", amount)).await?;
        tracing::info!(%id, amount, matched, "lease contract amount updated");
        Ok(matched)
    }

    async fn total_lease_by_origin_city(&self) -> Result<Vec<OriginCityTotal>> {
        let pipeline = group_pipeline(
            "originCity",
            "originCity",
            doc! {
                "totalLease": { "$sum": "$leaseAmount" },
                "contractsCount": { "$sum": 1 },
            },
        );

        let cursor = self
            .collection()
            .aggregate(pipeline)
            .await
            .map_err(|e| storage_error("total lease by origin city", e))?;
        collect(cursor, "total lease by origin city").await
    }

    async fn activate(&self, id: &Uuid) -> Result<bool> {
        let matched = self
            .update_by_id(id, set("status", ContractStatus::ACTIVE))
            .await?;
        tracing::info!(%id, matched, "lease contract activated");
        Ok(matched)
    }
}
