//! REST API Routes Module
//!
//! Every catalog route is mounted twice: at the root, and under `/api`
//! where the browser client expects it. Health, metrics and the OpenAPI
//! document live at the root only.

pub mod catalog;
pub mod component;
pub mod health;
pub mod product;

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    BoxError, Json, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};
use crate::types::{StatusMessage, ROOT_MESSAGE};

pub use catalog::create_router as catalog_router;
pub use component::create_router as component_router;
pub use health::create_router as health_router;
pub use product::create_router as product_router;

// ============================================================================
// SMALL HANDLERS
// ============================================================================

async fn root() -> impl IntoResponse {
    Json(StatusMessage {
        message: ROOT_MESSAGE.to_string(),
    })
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> ApiError {
    ApiError::route_not_found()
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::timeout()
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal_error("Internal server error")
    }
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// Empty origins allow any origin; otherwise only the configured ones,
/// where `*.example.com` admits any subdomain over http or https.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if !config.is_production() {
        tracing::info!("CORS: allowing all origins");
        return cors.allow_origin(Any);
    }

    tracing::info!(origins = ?config.cors_origins, "CORS: restricting origins");
    let allowed = config.clone();
    let cors = cors.allow_origin(AllowOrigin::predicate(
        move |origin: &header::HeaderValue, _| {
            origin
                .to_str()
                .is_ok_and(|origin| allowed.is_origin_allowed(origin))
        },
    ));

    if config.cors_allow_credentials {
        cors.allow_credentials(true)
    } else {
        cors
    }
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Catalog routes without any prefix.
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .nest("/components", component::create_router())
        .nest("/products", product::create_router())
        .nest("/catalog", catalog::create_router())
}

/// Create the complete API router.
///
/// # Middleware order (outer to inner)
/// 1. CORS
/// 2. Observability (span, log line, metrics)
/// 3. Timeout, answered with 504
/// 4. Body limit
pub fn create_api_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .route("/", get(root))
        .merge(catalog_routes())
        .nest("/api", catalog_routes())
        .nest("/health", health::create_router())
        .route("/metrics", get(metrics_handler))
        .route("/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .with_state(state);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/swagger-ui/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(config.request_timeout),
        )
        .layer(from_fn(observability_middleware))
        .layer(build_cors_layer(&config))
}
