//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` backed by a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per record type, named after `T::resource_name()`
//! (`orders`, `users`, `products`).
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and timestamps are therefore
//! stored as strings. The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::error::StorageError;
use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

const BACKEND: &str = "mongodb";

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Open a client and verify the deployment answers a `ping`.
pub async fn connect(uri: &str) -> std::result::Result<Client, StorageError> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| StorageError::ConnectionError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        })?;

    Ok(client)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
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

/// BSON values a string search term may be stored as
fn search_variants(value: &str) -> Vec<Bson> {
    let mut variants: Vec<Bson> = vec![Bson::String(value.to_string())];

    match value {
        "true" => variants.push(Bson::Boolean(true)),
        "false" => variants.push(Bson::Boolean(false)),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                variants.push(Bson::Int64(i));
            }
            if value.contains('.')
                && let Ok(f) = value.parse::<f64>()
            {
                variants.push(Bson::Double(f));
            }
        }
    }

    variants
}

fn query_error(action: &str, e: impl std::fmt::Display) -> anyhow::Error {
    anyhow::Error::new(StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", action, e),
    })
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let client = storefront::storage::mongodb::connect("mongodb://localhost:27017").await?;
/// let orders = MongoDataService::<Order>::new(client.database("storefront"));
/// orders.ensure_index(doc! { "user": 1, "createdAt": -1 }).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Entity + Serialize + DeserializeOwned> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    /// Create a secondary index on this record type's collection.
    pub async fn ensure_index(&self, keys: Document) -> Result<()> {
        self.collection()
            .create_index(IndexModel::builder().keys(keys).build())
            .await
            .map_err(|e| query_error("Failed to create index", e))?;
        Ok(())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
    }
}

#[async_trait]
impl<T: Entity + Serialize + DeserializeOwned> DataService<T> for MongoDataService<T> {
    /// Insert a new record. A duplicate `_id` is rejected by the server.
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| query_error("Failed to create entity", e))?;

        Ok(entity)
    }

    /// Returns `Ok(None)` if the record does not exist.
    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| query_error("Failed to get entity", e))?;

        match doc {
            Some(d) => Ok(Some(Self::document_to_entity(d)?)),
            None => Ok(None),
        }
    }

    /// Search records by field value, newest first.
    ///
    /// Values arrive as strings but may be stored with native BSON types,
    /// so `$in` is used with every plausible variant.
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let mut variants = search_variants(value);

        let filter = if variants.len() == 1 {
            doc! { field: variants.remove(0) }
        } else {
            doc! { field: { "$in": variants } }
        };

        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| query_error("Failed to search entities", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| query_error("Failed to collect search results", e))?;

        let mut found = docs
            .into_iter()
            .map(Self::document_to_entity)
            .collect::<Result<Vec<T>>>()?;
        // createdAt is stored as text; order on the parsed timestamp
        found.sort_by_key(|r| std::cmp::Reverse(r.created_at()));

        Ok(found)
    }

    /// Replace the document matching both `_id` and `field == expected`.
    async fn replace_if(
        &self,
        id: &Uuid,
        field: &str,
        expected: &str,
        entity: T,
    ) -> Result<Option<T>> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id), field: expected }, doc)
            .await
            .map_err(|e| query_error("Failed to update entity", e))?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        Ok(Some(entity))
    }
}
