//! OpenAPI Specification for the Stockroom API
//!
//! Collects every annotated handler and the record schemas into one
//! document, served at `/openapi.json` and printed by `generate-openapi`.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::{catalog, component, health, product};
use crate::telemetry::metrics as metrics_route;
use crate::types::{
    CreateProductRequest, DeletedComponentResponse, DeletedProductResponse, StatusMessage,
    UpdateProductRequest,
};

use stockroom_core::{
    CatalogSummary, Category, CategoryCount, Component, ComponentEntry, ComponentFields,
    ComponentInput, Product,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "0.1.0",
        description = "Electronic component library and product catalog",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5050", description = "Local Development"),
        (url = "http://localhost:5050/api", description = "Local Development (prefixed)")
    ),
    tags(
        (name = "Components", description = "Standalone parts library"),
        (name = "Products", description = "Products and their embedded component entries"),
        (name = "Catalog", description = "Dashboard totals"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Observability", description = "Prometheus metrics"),
    ),
    paths(
        // Components
        component::list_components,
        component::create_component,
        component::get_component,
        component::update_component,
        component::delete_component,
        component::export_components,
        // Products
        product::list_products,
        product::create_product,
        product::get_product,
        product::update_product,
        product::delete_product,
        product::list_components,
        product::add_component,
        product::remove_component,
        // Catalog
        catalog::summary,
        // Health
        health::ping,
        health::liveness,
        health::readiness,
        // Observability
        metrics_route::metrics_handler,
    ),
    components(
        schemas(
            // Errors
            ApiError,
            ErrorCode,
            // Records
            Component,
            ComponentInput,
            ComponentFields,
            ComponentEntry,
            Product,
            Category,
            CatalogSummary,
            CategoryCount,
            // Requests / responses
            CreateProductRequest,
            UpdateProductRequest,
            DeletedComponentResponse,
            DeletedProductResponse,
            StatusMessage,
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::StoreHealth,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the document as pretty-printed JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() -> Result<(), String> {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Stockroom API");

        let tags = openapi
            .tags
            .as_ref()
            .ok_or_else(|| "OpenAPI tags missing".to_string())?;
        assert_eq!(tags.len(), 5);

        let components = openapi
            .components
            .as_ref()
            .ok_or_else(|| "OpenAPI components missing".to_string())?;
        assert!(components.schemas.contains_key("Product"));
        assert!(components.schemas.contains_key("ApiError"));
        Ok(())
    }

    #[test]
    fn test_openapi_paths_exist() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/components",
            "/components/{id}",
            "/components/export",
            "/products",
            "/products/{id}",
            "/products/{id}/components",
            "/products/{id}/components/{entry_id}",
            "/catalog/summary",
            "/health/ready",
            "/metrics",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_product_entries_path_has_get_and_post() {
        let openapi = ApiDoc::openapi();
        let item = openapi.paths.paths.get("/products/{id}/components");
        assert!(item.is_some_and(|item| item.get.is_some() && item.post.is_some()));
    }

    #[test]
    fn test_openapi_json_serialization() -> Result<(), String> {
        let json = ApiDoc::to_json().map_err(|e| format!("Failed to serialize OpenAPI: {}", e))?;
        serde_json::from_str::<serde_json::Value>(&json)
            .map_err(|e| format!("Generated JSON invalid: {}", e))?;
        assert!(json.contains("Stockroom API"));
        Ok(())
    }
}
