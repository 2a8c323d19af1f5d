//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use stockroom_storage::RecordStore;

use crate::config::ApiConfig;
use crate::services::CatalogService;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub config: Arc<ApiConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: ApiConfig) -> Self {
        let catalog = CatalogService::new(store).with_write_attempts(config.product_write_retries);
        Self {
            catalog,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(CatalogService, catalog);
crate::impl_from_ref!(Arc<ApiConfig>, config);
crate::impl_from_ref!(Instant, start_time);
