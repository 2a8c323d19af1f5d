//! Catalog Service
//!
//! Validation and persistence orchestration for library components and
//! products. Product mutations are read-modify-write cycles guarded by the
//! store's product version and retried on conflict, so concurrent edits to
//! the same product's component list are never lost.

use std::sync::Arc;

use stockroom_core::{
    dates, filter_components, CatalogSummary, Component, ComponentFields, ComponentId,
    ComponentInput, EntryId, Product, ProductDraft, ProductId, StorageError,
};
use stockroom_storage::RecordStore;

use crate::config::DEFAULT_PRODUCT_WRITE_RETRIES;
use crate::error::{ApiError, ApiResult};
use crate::telemetry::metrics;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    write_attempts: u32,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_attempts: DEFAULT_PRODUCT_WRITE_RETRIES,
        }
    }

    /// Attempts per product write before answering 409. At least one.
    pub fn with_write_attempts(mut self, attempts: u32) -> Self {
        self.write_attempts = attempts.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Check the store is reachable.
    pub async fn ready(&self) -> ApiResult<()> {
        self.store.ping().await.map_err(ApiError::from)
    }

    // ========================================================================
    // STANDALONE COMPONENTS
    // ========================================================================

    /// All library components, optionally narrowed by a search query.
    pub async fn list_components(&self, query: Option<&str>) -> ApiResult<Vec<Component>> {
        let components = self.store.component_list().await?;
        Ok(match query {
            Some(q) => filter_components(&components, q)
                .into_iter()
                .cloned()
                .collect(),
            None => components,
        })
    }

    pub async fn create_component(&self, input: ComponentInput) -> ApiResult<Component> {
        input.fields.validate()?;
        let component = Component::create(stamp_last_updated(input));
        let result = self.store.component_insert(&component).await;
        record("create", "component", result.is_ok());
        result?;

        tracing::info!(component_id = %component.id, "Component created");
        Ok(component)
    }

    pub async fn get_component(&self, id: ComponentId) -> ApiResult<Component> {
        self.store
            .component_get(id)
            .await?
            .ok_or_else(ApiError::component_not_found)
    }

    /// Replace every field but the id.
    pub async fn update_component(
        &self,
        id: ComponentId,
        input: ComponentInput,
    ) -> ApiResult<Component> {
        input.fields.validate()?;
        let component = Component {
            id,
            data: stamp_last_updated(input),
        };
        let result = self.store.component_replace(&component).await;
        record("update", "component", result.is_ok());
        match result {
            Ok(()) => {}
            Err(StorageError::NotFound { .. }) => return Err(ApiError::component_not_found()),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(component_id = %id, "Component updated");
        Ok(component)
    }

    /// Remove a component and return what was stored.
    pub async fn delete_component(&self, id: ComponentId) -> ApiResult<Component> {
        let result = self.store.component_delete(id).await;
        record("delete", "component", matches!(result, Ok(Some(_))));
        let component = result?.ok_or_else(ApiError::component_not_found)?;

        tracing::info!(component_id = %id, "Component deleted");
        Ok(component)
    }

    // ========================================================================
    // PRODUCTS
    // ========================================================================

    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.store.product_list().await?)
    }

    pub async fn create_product(&self, draft: ProductDraft) -> ApiResult<Product> {
        let product = Product::create(draft);
        let result = self.store.product_insert(&product).await;
        record("create", "product", result.is_ok());
        result?;

        tracing::info!(
            product_id = %product.id,
            category = %product.category,
            "Product created"
        );
        Ok(product)
    }

    pub async fn get_product(&self, id: ProductId) -> ApiResult<Product> {
        self.store
            .product_get(id)
            .await?
            .map(|versioned| versioned.into_inner())
            .ok_or_else(ApiError::product_not_found)
    }

    /// Append a copy of `fields` as a new entry with a server-assigned id
    /// and date.
    pub async fn add_product_component(
        &self,
        id: ProductId,
        fields: ComponentFields,
    ) -> ApiResult<Product> {
        fields.validate()?;
        let mut entry_id = None;
        let product = self
            .modify_product(id, "add_component", |product| {
                entry_id = Some(product.add_component(fields.clone()));
                Ok(())
            })
            .await?;

        tracing::info!(
            product_id = %id,
            entry_id = ?entry_id.map(|e| e.to_string()),
            "Component added to product"
        );
        Ok(product)
    }

    /// Remove one entry. A missing entry is reported apart from a missing
    /// product and leaves the stored list untouched.
    pub async fn remove_product_component(
        &self,
        id: ProductId,
        entry_id: EntryId,
    ) -> ApiResult<Product> {
        let product = self
            .modify_product(id, "remove_component", |product| {
                if product.remove_component(entry_id) {
                    Ok(())
                } else {
                    Err(ApiError::product_component_not_found())
                }
            })
            .await?;

        tracing::info!(product_id = %id, entry_id = %entry_id, "Component removed from product");
        Ok(product)
    }

    /// Replace name and specifications. Category and entries are kept.
    pub async fn update_product_metadata(
        &self,
        id: ProductId,
        product_name: &str,
        specifications: &str,
    ) -> ApiResult<Product> {
        // Validate before touching the store so bad input never costs a read.
        stockroom_core::trimmed_metadata(product_name, specifications)?;
        let product = self
            .modify_product(id, "update_metadata", |product| {
                product
                    .update_metadata(product_name, specifications)
                    .map_err(ApiError::from)
            })
            .await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Delete a product together with its embedded entries.
    pub async fn delete_product(&self, id: ProductId) -> ApiResult<Product> {
        let result = self.store.product_delete(id).await;
        record("delete", "product", matches!(result, Ok(Some(_))));
        let product = result?.ok_or_else(ApiError::product_not_found)?;

        tracing::info!(
            product_id = %id,
            entries = product.components.len(),
            "Product deleted"
        );
        Ok(product)
    }

    // ========================================================================
    // DASHBOARD
    // ========================================================================

    pub async fn summary(&self) -> ApiResult<CatalogSummary> {
        let products = self.store.product_list().await?;
        let components = self.store.component_list().await?;
        Ok(CatalogSummary::compute(&products, &components))
    }

    // ========================================================================
    // VERSION-GUARDED PRODUCT WRITES
    // ========================================================================

    /// Read the product, apply `mutate`, and write it back only if nobody
    /// else wrote in between. On conflict the cycle restarts from a fresh
    /// read; after `write_attempts` conflicts the caller gets a 409.
    async fn modify_product<F>(
        &self,
        id: ProductId,
        operation: &'static str,
        mut mutate: F,
    ) -> ApiResult<Product>
    where
        F: FnMut(&mut Product) -> ApiResult<()> + Send,
    {
        for attempt in 1..=self.write_attempts {
            let current = self
                .store
                .product_get(id)
                .await?
                .ok_or_else(ApiError::product_not_found)?;
            let version = current.version;
            let mut product = current.into_inner();

            if let Err(err) = mutate(&mut product) {
                record(operation, "product", false);
                return Err(err);
            }

            match self.store.product_replace(&product, version).await {
                Ok(_) => {
                    record(operation, "product", true);
                    return Ok(product);
                }
                Err(StorageError::VersionConflict { .. }) => {
                    if let Some(m) = metrics() {
                        m.record_write_conflict(operation);
                    }
                    tracing::debug!(
                        product_id = %id,
                        operation,
                        attempt,
                        "Product version conflict, retrying"
                    );
                    tokio::task::yield_now().await;
                }
                Err(StorageError::NotFound { .. }) => {
                    record(operation, "product", false);
                    return Err(ApiError::product_not_found());
                }
                Err(err) => {
                    record(operation, "product", false);
                    return Err(err.into());
                }
            }
        }

        record(operation, "product", false);
        tracing::warn!(
            product_id = %id,
            operation,
            attempts = self.write_attempts,
            "Giving up on product write after repeated conflicts"
        );
        Err(ApiError::concurrent_modification("Product", id))
    }
}

/// Fill in today's date when the client sent no `lastUpdated`.
fn stamp_last_updated(mut input: ComponentInput) -> ComponentInput {
    let blank = input
        .last_updated
        .as_deref()
        .map_or(true, |s| s.trim().is_empty());
    if blank {
        input.last_updated = Some(dates::today());
    }
    input
}

fn record(operation: &str, entity: &str, success: bool) {
    if let Some(m) = metrics() {
        m.record_catalog_operation(operation, entity, success);
    }
}
