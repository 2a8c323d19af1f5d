//! Component Library REST Routes
//!
//! Standalone components: list/search, create, read, replace, delete and
//! the spreadsheet export.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use stockroom_core::{Component, ComponentId, ComponentInput};

use crate::{
    error::{ApiError, ApiResult},
    export::{components_workbook, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE},
    extractors::{AppJson, PathId},
    services::CatalogService,
    state::AppState,
    types::{ComponentSearchParams, DeletedComponentResponse},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /components - List library components
#[utoipa::path(
    get,
    path = "/components",
    tag = "Components",
    params(ComponentSearchParams),
    responses(
        (status = 200, description = "Library components in insertion order", body = Vec<Component>),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn list_components(
    State(catalog): State<CatalogService>,
    Query(params): Query<ComponentSearchParams>,
) -> ApiResult<impl IntoResponse> {
    let components = catalog.list_components(params.q.as_deref()).await?;
    Ok(AppJson(components))
}

/// POST /components - Create a library component
#[utoipa::path(
    post,
    path = "/components",
    tag = "Components",
    request_body = ComponentInput,
    responses(
        (status = 201, description = "Component created", body = Component),
        (status = 400, description = "Invalid attribute value", body = ApiError),
    ),
)]
pub async fn create_component(
    State(catalog): State<CatalogService>,
    AppJson(input): AppJson<ComponentInput>,
) -> ApiResult<impl IntoResponse> {
    let component = catalog.create_component(input).await?;
    Ok((StatusCode::CREATED, AppJson(component)))
}

/// GET /components/{id} - Fetch one component
#[utoipa::path(
    get,
    path = "/components/{id}",
    tag = "Components",
    params(("id" = String, Path, description = "Component ID (24 hex digits)")),
    responses(
        (status = 200, description = "Component found", body = Component),
        (status = 400, description = "Malformed component ID", body = ApiError),
        (status = 404, description = "Component not found", body = ApiError),
    ),
)]
pub async fn get_component(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ComponentId>,
) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.get_component(id).await?))
}

/// PUT /components/{id} - Replace a component's attributes
#[utoipa::path(
    put,
    path = "/components/{id}",
    tag = "Components",
    params(("id" = String, Path, description = "Component ID (24 hex digits)")),
    request_body = ComponentInput,
    responses(
        (status = 200, description = "Component updated", body = Component),
        (status = 400, description = "Malformed ID or invalid attribute value", body = ApiError),
        (status = 404, description = "Component not found", body = ApiError),
    ),
)]
pub async fn update_component(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ComponentId>,
    AppJson(input): AppJson<ComponentInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.update_component(id, input).await?))
}

/// DELETE /components/{id} - Delete a component
#[utoipa::path(
    delete,
    path = "/components/{id}",
    tag = "Components",
    params(("id" = String, Path, description = "Component ID (24 hex digits)")),
    responses(
        (status = 200, description = "Component deleted", body = DeletedComponentResponse),
        (status = 400, description = "Malformed component ID", body = ApiError),
        (status = 404, description = "Component not found", body = ApiError),
    ),
)]
pub async fn delete_component(
    State(catalog): State<CatalogService>,
    PathId(id): PathId<ComponentId>,
) -> ApiResult<impl IntoResponse> {
    let component = catalog.delete_component(id).await?;
    Ok(AppJson(DeletedComponentResponse::new(component)))
}

/// GET /components/export - Download the library as a spreadsheet
#[utoipa::path(
    get,
    path = "/components/export",
    tag = "Components",
    responses(
        (status = 200, description = "Excel workbook attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 500, description = "Store or workbook failure", body = ApiError),
    ),
)]
pub async fn export_components(
    State(catalog): State<CatalogService>,
) -> ApiResult<impl IntoResponse> {
    let components = catalog.list_components(None).await?;
    let bytes = components_workbook(&components)?;

    tracing::info!(rows = components.len(), "Component library exported");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    ))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_components).post(create_component))
        .route("/export", get(export_components))
        .route(
            "/:id",
            get(get_component)
                .put(update_component)
                .delete(delete_component),
        )
}
