//! Stockroom Storage - Record Store Contract
//!
//! Defines the storage abstraction the catalog service writes through, and
//! an in-memory implementation used by tests and by memory-backed servers.
//! The PostgreSQL implementation lives in stockroom-api.

mod memory;

pub use memory::InMemoryRecordStore;

use async_trait::async_trait;
use stockroom_core::{Component, ComponentId, Product, ProductId, StorageResult};

/// A record paired with the store-private version it was read at.
///
/// Versions are never sent to clients. They exist so product writes can be
/// made conditional on nothing else having written in between.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub record: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    pub fn new(record: T, version: u64) -> Self {
        Self { record, version }
    }

    pub fn into_inner(self) -> T {
        self.record
    }
}

/// Durable holder of components and products.
///
/// Lookups of absent records return `Ok(None)`; writes against absent
/// records return `StorageError::NotFound`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn ping(&self) -> StorageResult<()>;

    // ========================================================================
    // COMPONENT OPERATIONS
    // ========================================================================

    async fn component_list(&self) -> StorageResult<Vec<Component>>;

    async fn component_get(&self, id: ComponentId) -> StorageResult<Option<Component>>;

    async fn component_insert(&self, component: &Component) -> StorageResult<()>;

    /// Overwrite every field of an existing component.
    async fn component_replace(&self, component: &Component) -> StorageResult<()>;

    /// Remove a component, returning what was stored.
    async fn component_delete(&self, id: ComponentId) -> StorageResult<Option<Component>>;

    // ========================================================================
    // PRODUCT OPERATIONS
    // ========================================================================

    async fn product_list(&self) -> StorageResult<Vec<Product>>;

    async fn product_get(&self, id: ProductId) -> StorageResult<Option<Versioned<Product>>>;

    async fn product_insert(&self, product: &Product) -> StorageResult<()>;

    /// Write `product` only if its stored version is still `expected_version`.
    ///
    /// Returns the new version. A stale version yields
    /// `StorageError::VersionConflict` and leaves the stored product intact.
    async fn product_replace(&self, product: &Product, expected_version: u64)
        -> StorageResult<u64>;

    /// Remove a product together with all of its embedded entries.
    async fn product_delete(&self, id: ProductId) -> StorageResult<Option<Product>>;
}
