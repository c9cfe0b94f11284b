//! Entity trait shared by every persisted record

use uuid::Uuid;

/// Base trait for the records kept by the stores.
///
/// Every entity has a store-assigned identifier and knows the name of the
/// collection it lives in. The identifier is generated on creation and never
/// changes afterwards.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name, also the collection name (e.g. "trucks")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g. "truck")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;
}
