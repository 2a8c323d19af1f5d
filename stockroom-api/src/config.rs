//! API Configuration Module
//!
//! CORS, request hardening and write-retry settings for the HTTP surface.
//! Loaded from environment variables with development-friendly defaults.

use std::time::Duration;

/// Default attempts for a version-guarded product write.
pub const DEFAULT_PRODUCT_WRITE_RETRIES: u32 = 8;

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins, which is what the bundled browser
    /// client relies on during development.
    pub cors_origins: Vec<String>,

    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Request Hardening
    // ========================================================================
    /// Requests running longer than this are answered with 504.
    pub request_timeout: Duration,

    /// Largest accepted request body.
    pub body_limit_bytes: usize,

    // ========================================================================
    // Product Writes
    // ========================================================================
    /// Attempts made for a product read-modify-write before giving up with
    /// a 409.
    pub product_write_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_allow_credentials: false,
            cors_max_age_secs: 86400,
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            product_write_retries: DEFAULT_PRODUCT_WRITE_RETRIES,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `STOCKROOM_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `STOCKROOM_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `STOCKROOM_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `STOCKROOM_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
    /// - `STOCKROOM_BODY_LIMIT_BYTES`: Max request body (default: 1048576)
    /// - `STOCKROOM_PRODUCT_WRITE_RETRIES`: Attempts per product write (default: 8)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let cors_origins = std::env::var("STOCKROOM_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("STOCKROOM_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(defaults.cors_allow_credentials);

        let cors_max_age_secs = env_parse("STOCKROOM_CORS_MAX_AGE_SECS")
            .unwrap_or(defaults.cors_max_age_secs);

        let request_timeout = env_parse("STOCKROOM_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let body_limit_bytes =
            env_parse("STOCKROOM_BODY_LIMIT_BYTES").unwrap_or(defaults.body_limit_bytes);

        let product_write_retries = env_parse::<u32>("STOCKROOM_PRODUCT_WRITE_RETRIES")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.product_write_retries);

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            request_timeout,
            body_limit_bytes,
            product_write_retries,
        }
    }

    /// Strict CORS is on once any origin is configured.
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                let host = origin
                    .strip_prefix("https://")
                    .or_else(|| origin.strip_prefix("http://"));
                if let Some(host) = host {
                    return host.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

// ============================================================================
// STORE BACKEND SELECTION
// ============================================================================

/// Which record store the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl StoreBackend {
    /// Read `STOCKROOM_STORE` ("postgres" or "memory").
    pub fn from_env() -> Result<Self, String> {
        match std::env::var("STOCKROOM_STORE") {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "" | "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Unknown STOCKROOM_STORE '{}', expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_allow_credentials);
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.product_write_retries, 8);
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins(" http://localhost:3000 , ,https://stock.example.com"),
            vec!["http://localhost:3000", "https://stock.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_origin_allowed_dev_mode() {
        let config = ApiConfig::default();
        assert!(!config.is_production());
        assert!(config.is_origin_allowed("http://localhost:3000"));
    }

    #[test]
    fn test_origin_allowed_production() {
        let config = ApiConfig {
            cors_origins: vec![
                "https://stock.example.com".to_string(),
                "*.lab.example.com".to_string(),
            ],
            ..ApiConfig::default()
        };

        assert!(config.is_production());
        assert!(config.is_origin_allowed("https://stock.example.com"));
        assert!(config.is_origin_allowed("https://bench.lab.example.com"));
        assert!(!config.is_origin_allowed("https://evil.com"));
        assert!(!config.is_origin_allowed("https://notlab.example.com"));
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("memory"), Ok(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse(" Postgres "), Ok(StoreBackend::Postgres));
        assert_eq!(StoreBackend::parse(""), Ok(StoreBackend::Postgres));
        assert!(StoreBackend::parse("mongo").is_err());
    }
}
