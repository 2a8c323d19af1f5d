//! Product REST Routes
//!
//! Products and the component entries embedded in them. Entry add and
//! remove answer with the whole updated product so the client can splice
//! it straight into its grouped view.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use stockroom_core::{ComponentEntry, ComponentFields, EntryId, Product, ProductId};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{AppJson, PathId, PathIds},
    services::CatalogService,
    state::AppState,
    types::{CreateProductRequest, DeletedProductResponse, UpdateProductRequest},
    validation::require,
};

// ============================================================================
// PRODUCT HANDLERS
// ============================================================================

/// GET /products - List every product with its entries
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn list_products(State(catalog): State<CatalogService>) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.list_products().await?))
}

/// POST /products - Create a product with no entries
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Missing field or unknown category", body = ApiError),
    ),
)]
pub async fn create_product(
    State(catalog): State<CatalogService>,
    AppJson(req): AppJson<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let product = catalog.create_product(req.into_draft()?).await?;
    Ok((StatusCode::CREATED, AppJson(product)))
}

/// GET /products/{id} - Fetch one product
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex digits)")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Malformed product ID", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
    ),
)]
pub async fn get_product(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ProductId>,
) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.get_product(id).await?))
}

/// PUT /products/{id} - Rename a product or change its specifications
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex digits)")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Malformed ID or blank field", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
        (status = 409, description = "Concurrent writers kept winning", body = ApiError),
    ),
)]
pub async fn update_product(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ProductId>,
    AppJson(req): AppJson<UpdateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    let product_name = require(&req.product_name, "productName")?;
    let specifications = require(&req.specifications, "specifications")?;
    let product = catalog
        .update_product_metadata(id, product_name, specifications)
        .await?;
    Ok(AppJson(product))
}

/// DELETE /products/{id} - Delete a product and its entries
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex digits)")),
    responses(
        (status = 200, description = "Product deleted", body = DeletedProductResponse),
        (status = 400, description = "Malformed product ID", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
    ),
)]
pub async fn delete_product(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ProductId>,
) -> ApiResult<impl IntoResponse> {
    let product = catalog.delete_product(id).await?;
    Ok(AppJson(DeletedProductResponse::new(product)))
}

// ============================================================================
// EMBEDDED ENTRY HANDLERS
// ============================================================================

/// GET /products/{id}/components - List a product's component entries
#[utoipa::path(
    get,
    path = "/products/{id}/components",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex digits)")),
    responses(
        (status = 200, description = "Entries in the order they were added", body = Vec<ComponentEntry>),
        (status = 400, description = "Malformed product ID", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
    ),
)]
pub async fn list_components(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ProductId>,
) -> ApiResult<impl IntoResponse> {
    let product = catalog.get_product(id).await?;
    Ok(AppJson(product.components))
}

/// POST /products/{id}/components - Append a component entry
#[utoipa::path(
    post,
    path = "/products/{id}/components",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex digits)")),
    request_body = ComponentFields,
    responses(
        (status = 200, description = "Entry added; full updated product", body = Product),
        (status = 400, description = "Malformed ID or invalid attribute value", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError),
        (status = 409, description = "Concurrent writers kept winning", body = ApiError),
    ),
)]
pub async fn add_component(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ProductId>,
    AppJson(fields): AppJson<ComponentFields>,
) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.add_product_component(id, fields).await?))
}

/// DELETE /products/{id}/components/{entry_id} - Remove a component entry
#[utoipa::path(
    delete,
    path = "/products/{id}/components/{entry_id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24 hex digits)"),
        ("entry_id" = String, Path, description = "Component entry ID (24 hex digits)"),
    ),
    responses(
        (status = 200, description = "Entry removed; full updated product", body = Product),
        (status = 400, description = "Malformed ID", body = ApiError),
        (status = 404, description = "Product or entry not found", body = ApiError),
        (status = 409, description = "Concurrent writers kept winning", body = ApiError),
    ),
)]
pub async fn remove_component(
    State(catalog): State<CatalogService>,
    PathIds((id, entry_id)): PathIds<(ProductId, EntryId)>,
) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.remove_product_component(id, entry_id).await?))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/components", get(list_components).post(add_component))
        .route("/:id/components/:entry_id", delete(remove_component))
}
