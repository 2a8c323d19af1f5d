//! In-memory record store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use stockroom_core::{
    Component, ComponentId, Product, ProductId, RecordIdType, RecordKind, StorageError,
    StorageResult,
};

use crate::{RecordStore, Versioned};

#[derive(Debug, Clone)]
struct Slot<T> {
    seq: u64,
    version: u64,
    record: T,
}

/// Records held in process memory. Lists come back in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    components: Arc<RwLock<HashMap<ComponentId, Slot<Component>>>>,
    products: Arc<RwLock<HashMap<ProductId, Slot<Product>>>>,
    next_seq: Arc<AtomicU64>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn component_count(&self) -> usize {
        self.components.read().await.len()
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Drop every stored record.
    pub async fn clear(&self) {
        self.components.write().await.clear();
        self.products.write().await.clear();
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }
}

fn in_order<K, T: Clone>(map: &HashMap<K, Slot<T>>) -> Vec<T> {
    let mut slots: Vec<&Slot<T>> = map.values().collect();
    slots.sort_by_key(|slot| slot.seq);
    slots.into_iter().map(|slot| slot.record.clone()).collect()
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    // === Component Operations ===

    async fn component_list(&self) -> StorageResult<Vec<Component>> {
        Ok(in_order(&*self.components.read().await))
    }

    async fn component_get(&self, id: ComponentId) -> StorageResult<Option<Component>> {
        let components = self.components.read().await;
        Ok(components.get(&id).map(|slot| slot.record.clone()))
    }

    async fn component_insert(&self, component: &Component) -> StorageResult<()> {
        let mut components = self.components.write().await;
        if components.contains_key(&component.id) {
            return Err(StorageError::AlreadyExists {
                kind: RecordKind::Component,
                id: component.id.record_id(),
            });
        }
        let seq = self.seq();
        components.insert(
            component.id,
            Slot {
                seq,
                version: 0,
                record: component.clone(),
            },
        );
        Ok(())
    }

    async fn component_replace(&self, component: &Component) -> StorageResult<()> {
        let mut components = self.components.write().await;
        let slot = components
            .get_mut(&component.id)
            .ok_or(StorageError::NotFound {
                kind: RecordKind::Component,
                id: component.id.record_id(),
            })?;
        slot.record = component.clone();
        slot.version += 1;
        Ok(())
    }

    async fn component_delete(&self, id: ComponentId) -> StorageResult<Option<Component>> {
        let mut components = self.components.write().await;
        Ok(components.remove(&id).map(|slot| slot.record))
    }

    // === Product Operations ===

    async fn product_list(&self) -> StorageResult<Vec<Product>> {
        Ok(in_order(&*self.products.read().await))
    }

    async fn product_get(&self, id: ProductId) -> StorageResult<Option<Versioned<Product>>> {
        let products = self.products.read().await;
        Ok(products
            .get(&id)
            .map(|slot| Versioned::new(slot.record.clone(), slot.version)))
    }

    async fn product_insert(&self, product: &Product) -> StorageResult<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id) {
            return Err(StorageError::AlreadyExists {
                kind: RecordKind::Product,
                id: product.id.record_id(),
            });
        }
        let seq = self.seq();
        products.insert(
            product.id,
            Slot {
                seq,
                version: 0,
                record: product.clone(),
            },
        );
        Ok(())
    }

    async fn product_replace(
        &self,
        product: &Product,
        expected_version: u64,
    ) -> StorageResult<u64> {
        let mut products = self.products.write().await;
        let slot = products.get_mut(&product.id).ok_or(StorageError::NotFound {
            kind: RecordKind::Product,
            id: product.id.record_id(),
        })?;
        if slot.version != expected_version {
            return Err(StorageError::VersionConflict {
                kind: RecordKind::Product,
                id: product.id.record_id(),
                expected: expected_version,
            });
        }
        slot.record = product.clone();
        slot.version += 1;
        Ok(slot.version)
    }

    async fn product_delete(&self, id: ProductId) -> StorageResult<Option<Product>> {
        let mut products = self.products.write().await;
        Ok(products.remove(&id).map(|slot| slot.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{ComponentFields, ComponentInput, ProductDraft, ValidationError};

    fn widget() -> Result<Product, ValidationError> {
        Ok(Product::create(ProductDraft::new("Widget", "10V", "ISRO")?))
    }

    fn resistor() -> Component {
        Component::create(ComponentInput {
            sl_no: Some(1),
            fields: ComponentFields {
                item_name: Some("Resistor".to_string()),
                ..Default::default()
            },
            last_updated: None,
        })
    }

    #[tokio::test]
    async fn test_component_insert_get() -> Result<(), StorageError> {
        let store = InMemoryRecordStore::new();
        let component = resistor();

        store.component_insert(&component).await?;
        let fetched = store.component_get(component.id).await?;

        assert_eq!(fetched, Some(component));
        Ok(())
    }

    #[tokio::test]
    async fn test_component_insert_duplicate() -> Result<(), StorageError> {
        let store = InMemoryRecordStore::new();
        let component = resistor();

        store.component_insert(&component).await?;
        let result = store.component_insert(&component).await;

        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_component_replace_missing() {
        let store = InMemoryRecordStore::new();
        let result = store.component_replace(&resistor()).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_component_delete_returns_record() -> Result<(), StorageError> {
        let store = InMemoryRecordStore::new();
        let component = resistor();
        store.component_insert(&component).await?;

        assert_eq!(store.component_delete(component.id).await?, Some(component.clone()));
        assert_eq!(store.component_delete(component.id).await?, None);
        assert_eq!(store.component_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_lists_keep_insertion_order() -> Result<(), StorageError> {
        let store = InMemoryRecordStore::new();
        let parts: Vec<Component> = (0..20).map(|_| resistor()).collect();
        for part in &parts {
            store.component_insert(part).await?;
        }
        let listed = store.component_list().await?;
        assert_eq!(listed, parts);
        Ok(())
    }

    #[tokio::test]
    async fn test_product_replace_checks_version() -> Result<(), Box<dyn std::error::Error>> {
        let store = InMemoryRecordStore::new();
        let product = widget()?;
        store.product_insert(&product).await?;

        let Some(current) = store.product_get(product.id).await? else {
            panic!("product missing after insert");
        };
        assert_eq!(current.version, 0);

        let mut first = current.record.clone();
        first.add_component(ComponentFields::default());
        let version = store.product_replace(&first, current.version).await?;
        assert_eq!(version, 1);

        let mut stale = current.record.clone();
        stale.add_component(ComponentFields::default());
        let result = store.product_replace(&stale, current.version).await;
        assert!(matches!(result, Err(StorageError::VersionConflict { expected: 0, .. })));

        let stored = store.product_get(product.id).await?.map(Versioned::into_inner);
        assert_eq!(stored, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_delete_takes_entries() -> Result<(), Box<dyn std::error::Error>> {
        let store = InMemoryRecordStore::new();
        let mut product = widget()?;
        product.add_component(ComponentFields::default());
        store.product_insert(&product).await?;

        let removed = store.product_delete(product.id).await?;
        assert_eq!(removed.map(|p| p.components.len()), Some(1));
        assert!(store.product_get(product.id).await?.is_none());

        let result = store.product_replace(&product, 0).await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_clones_share_state() -> Result<(), Box<dyn std::error::Error>> {
        let store = InMemoryRecordStore::new();
        let handle = store.clone();
        handle.product_insert(&widget()?).await?;
        assert_eq!(store.product_count().await, 1);
        store.clear().await;
        assert_eq!(handle.product_count().await, 0);
        Ok(())
    }
}
