//! Service traits for persistence and the external collaborators

use crate::core::Entity;
use crate::core::directory::{Product, User};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence contract for one record type.
///
/// Records are created, read and conditionally replaced. There is no
/// delete: orders are retained for history.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Insert a new record. Fails if the id is already taken.
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// Find records whose `field` equals `value`, newest first
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// Replace the record `id` only while its `field` still equals `expected`.
    ///
    /// Returns `Ok(None)` when no record matched both conditions.
    async fn replace_if(
        &self,
        id: &Uuid,
        field: &str,
        expected: &str,
        entity: T,
    ) -> Result<Option<T>>;
}

/// User directory collaborator
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve_user(&self, id: &Uuid) -> Result<Option<User>>;
}

/// Product catalog collaborator
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn resolve_product(&self, id: &Uuid) -> Result<Option<Product>>;
}

/// Any user store doubles as the user directory
#[async_trait]
impl<S> UserDirectory for S
where
    S: DataService<User>,
{
    async fn resolve_user(&self, id: &Uuid) -> Result<Option<User>> {
        self.get(id).await
    }
}

/// Any product store doubles as the product catalog
#[async_trait]
impl<S> ProductCatalog for S
where
    S: DataService<Product>,
{
    async fn resolve_product(&self, id: &Uuid) -> Result<Option<Product>> {
        self.get(id).await
    }
}
