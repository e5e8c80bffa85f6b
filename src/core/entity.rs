//! Entity trait shared by every record the stores persist

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all persisted records.
///
/// Every record has:
/// - id: Unique identifier, assigned at creation
/// - created_at: Creation timestamp
///
/// Stores use `resource_name()` as the collection name and
/// `field_value()` for equality search on document fields.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name, used as collection name (e.g., "orders")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "order")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// String form of a searchable document field, `None` if the field
    /// does not exist or is not searchable
    fn field_value(&self, field: &str) -> Option<String>;
}
