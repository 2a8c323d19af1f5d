//! Stockroom API Server Entry Point
//!
//! Reads configuration, opens the record store and serves the router.
//! A store that cannot be reached at startup is fatal.

use std::net::SocketAddr;
use std::sync::Arc;

use stockroom_api::telemetry::{init_tracer, TelemetryConfig};
use stockroom_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, DbConfig, PgRecordStore,
    StoreBackend,
};
use stockroom_storage::{InMemoryRecordStore, RecordStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::default();
    init_tracer(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let backend = StoreBackend::from_env().map_err(ApiError::invalid_input)?;
    let store = open_store(backend).await?;

    let app = create_api_router(AppState::new(store, api_config));

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, ?backend, "Starting Stockroom API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn open_store(backend: StoreBackend) -> ApiResult<Arc<dyn RecordStore>> {
    match backend {
        StoreBackend::Postgres => {
            let db_config = DbConfig::from_env();
            let store = PgRecordStore::from_config(&db_config)?;
            if let Err(e) = store.ensure_schema().await {
                tracing::error!(
                    error = %e,
                    host = %db_config.host,
                    dbname = %db_config.dbname,
                    "Record store unreachable at startup"
                );
                return Err(e.into());
            }
            tracing::info!(pool_size = store.pool_size(), "Connected to PostgreSQL");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data is lost on exit");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("STOCKROOM_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("STOCKROOM_API_PORT").ok())
        .unwrap_or_else(|| "5050".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
