//! Stockroom API - HTTP Layer
//!
//! Serves the component library and product catalog over REST (axum),
//! backed by any `RecordStore`: PostgreSQL in production, in-memory for
//! tests and local runs.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{ApiConfig, StoreBackend};
pub use db::{DbConfig, PgRecordStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::CatalogService;
pub use state::AppState;
pub use types::*;
