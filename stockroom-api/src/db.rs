//! PostgreSQL Record Store
//!
//! Connection pooling via deadpool-postgres and a `RecordStore`
//! implementation that keeps each record as a JSONB document. Products
//! carry a version column so read-modify-write cycles can be made
//! conditional.

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio_postgres::NoTls;

use crate::error::{ApiError, ApiResult};
use stockroom_core::{
    Component, ComponentId, Product, ProductId, RecordIdType, RecordKind, StorageError,
    StorageResult,
};
use stockroom_storage::{RecordStore, Versioned};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait/create/recycle timeout for pooled connections
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "inventory".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from `STOCKROOM_DB_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("STOCKROOM_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("STOCKROOM_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("STOCKROOM_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("STOCKROOM_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("STOCKROOM_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("STOCKROOM_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("STOCKROOM_DB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = deadpool_postgres::PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        pool_cfg.timeouts.create = Some(self.timeout);
        pool_cfg.timeouts.recycle = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS components (
    id       TEXT PRIMARY KEY,
    seq      BIGSERIAL,
    version  BIGINT NOT NULL DEFAULT 0,
    body     JSONB NOT NULL
);
CREATE TABLE IF NOT EXISTS products (
    id       TEXT PRIMARY KEY,
    seq      BIGSERIAL,
    version  BIGINT NOT NULL DEFAULT 0,
    body     JSONB NOT NULL
);
";

// ============================================================================
// POSTGRES RECORD STORE
// ============================================================================

/// Record store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: Pool,
}

impl PgRecordStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        Ok(Self::new(config.create_pool()?))
    }

    /// Current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Create tables if missing. Run once at startup; an error here means
    /// the store is unreachable.
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        let conn = self.conn().await?;
        conn.batch_execute(SCHEMA).await.map_err(pg_error)?;
        tracing::info!("Record store schema ready");
        Ok(())
    }

    async fn conn(&self) -> StorageResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(pool_error)
    }
}

fn pg_error(err: tokio_postgres::Error) -> StorageError {
    StorageError::backend(format!("{:?}", err))
}

fn pool_error(err: PoolError) -> StorageError {
    match err {
        PoolError::Timeout(_) | PoolError::Closed => StorageError::Unavailable {
            reason: err.to_string(),
        },
        other => StorageError::backend(other),
    }
}

fn to_body<T: serde::Serialize>(record: &T) -> StorageResult<JsonValue> {
    serde_json::to_value(record).map_err(StorageError::backend)
}

fn from_body<T: DeserializeOwned>(body: JsonValue) -> StorageResult<T> {
    serde_json::from_value(body).map_err(StorageError::backend)
}

fn to_db_version(version: u64) -> StorageResult<i64> {
    i64::try_from(version).map_err(StorageError::backend)
}

fn from_db_version(version: i64) -> StorageResult<u64> {
    u64::try_from(version).map_err(StorageError::backend)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> StorageResult<()> {
        let conn = self.conn().await?;
        conn.simple_query("SELECT 1").await.map_err(pg_error)?;
        Ok(())
    }

    // ========================================================================
    // COMPONENT OPERATIONS
    // ========================================================================

    async fn component_list(&self) -> StorageResult<Vec<Component>> {
        let conn = self.conn().await?;
        let rows = conn
            .query("SELECT body FROM components ORDER BY seq", &[])
            .await
            .map_err(pg_error)?;
        rows.into_iter().map(|row| from_body(row.get(0))).collect()
    }

    async fn component_get(&self, id: ComponentId) -> StorageResult<Option<Component>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt("SELECT body FROM components WHERE id = $1", &[&id.to_string()])
            .await
            .map_err(pg_error)?;
        row.map(|row| from_body(row.get(0))).transpose()
    }

    async fn component_insert(&self, component: &Component) -> StorageResult<()> {
        let conn = self.conn().await?;
        let inserted = conn
            .execute(
                "INSERT INTO components (id, body) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
                &[&component.id.to_string(), &to_body(component)?],
            )
            .await
            .map_err(pg_error)?;
        if inserted == 0 {
            return Err(StorageError::AlreadyExists {
                kind: RecordKind::Component,
                id: component.id.record_id(),
            });
        }
        Ok(())
    }

    async fn component_replace(&self, component: &Component) -> StorageResult<()> {
        let conn = self.conn().await?;
        let updated = conn
            .execute(
                "UPDATE components SET body = $2, version = version + 1 WHERE id = $1",
                &[&component.id.to_string(), &to_body(component)?],
            )
            .await
            .map_err(pg_error)?;
        if updated == 0 {
            return Err(StorageError::NotFound {
                kind: RecordKind::Component,
                id: component.id.record_id(),
            });
        }
        Ok(())
    }

    async fn component_delete(&self, id: ComponentId) -> StorageResult<Option<Component>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "DELETE FROM components WHERE id = $1 RETURNING body",
                &[&id.to_string()],
            )
            .await
            .map_err(pg_error)?;
        row.map(|row| from_body(row.get(0))).transpose()
    }

    // ========================================================================
    // PRODUCT OPERATIONS
    // ========================================================================

    async fn product_list(&self) -> StorageResult<Vec<Product>> {
        let conn = self.conn().await?;
        let rows = conn
            .query("SELECT body FROM products ORDER BY seq", &[])
            .await
            .map_err(pg_error)?;
        rows.into_iter().map(|row| from_body(row.get(0))).collect()
    }

    async fn product_get(&self, id: ProductId) -> StorageResult<Option<Versioned<Product>>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT body, version FROM products WHERE id = $1",
                &[&id.to_string()],
            )
            .await
            .map_err(pg_error)?;
        match row {
            Some(row) => {
                let product = from_body(row.get(0))?;
                let version = from_db_version(row.get(1))?;
                Ok(Some(Versioned::new(product, version)))
            }
            None => Ok(None),
        }
    }

    async fn product_insert(&self, product: &Product) -> StorageResult<()> {
        let conn = self.conn().await?;
        let inserted = conn
            .execute(
                "INSERT INTO products (id, body) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
                &[&product.id.to_string(), &to_body(product)?],
            )
            .await
            .map_err(pg_error)?;
        if inserted == 0 {
            return Err(StorageError::AlreadyExists {
                kind: RecordKind::Product,
                id: product.id.record_id(),
            });
        }
        Ok(())
    }

    async fn product_replace(
        &self,
        product: &Product,
        expected_version: u64,
    ) -> StorageResult<u64> {
        let conn = self.conn().await?;
        let id = product.id.to_string();
        let row = conn
            .query_opt(
                "UPDATE products SET body = $2, version = version + 1 \
                 WHERE id = $1 AND version = $3 RETURNING version",
                &[&id, &to_body(product)?, &to_db_version(expected_version)?],
            )
            .await
            .map_err(pg_error)?;
        if let Some(row) = row {
            return from_db_version(row.get(0));
        }

        // Nothing matched: tell a stale version apart from a deleted product.
        let exists = conn
            .query_opt("SELECT 1 FROM products WHERE id = $1", &[&id])
            .await
            .map_err(pg_error)?
            .is_some();
        if exists {
            Err(StorageError::VersionConflict {
                kind: RecordKind::Product,
                id: product.id.record_id(),
                expected: expected_version,
            })
        } else {
            Err(StorageError::NotFound {
                kind: RecordKind::Product,
                id: product.id.record_id(),
            })
        }
    }

    async fn product_delete(&self, id: ProductId) -> StorageResult<Option<Product>> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "DELETE FROM products WHERE id = $1 RETURNING body",
                &[&id.to_string()],
            )
            .await
            .map_err(pg_error)?;
        row.map(|row| from_body(row.get(0))).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_config() {
        let config = DbConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.max_size, 16);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_version_conversion_bounds() {
        assert_eq!(to_db_version(7).ok(), Some(7));
        assert!(to_db_version(u64::MAX).is_err());
        assert!(from_db_version(-1).is_err());
    }

    #[test]
    fn test_pool_timeout_maps_to_unavailable() {
        let err = pool_error(PoolError::Closed);
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }
}
