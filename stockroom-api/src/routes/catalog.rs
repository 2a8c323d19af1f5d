//! Dashboard summary route.

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use stockroom_core::CatalogSummary;

use crate::{
    error::{ApiError, ApiResult},
    extractors::AppJson,
    services::CatalogService,
    state::AppState,
};

/// GET /catalog/summary - Dashboard totals
#[utoipa::path(
    get,
    path = "/catalog/summary",
    tag = "Catalog",
    responses(
        (status = 200, description = "Catalog totals and per-category counts", body = CatalogSummary),
        (status = 500, description = "Store failure", body = ApiError),
    ),
)]
pub async fn summary(State(catalog): State<CatalogService>) -> ApiResult<impl IntoResponse> {
    Ok(AppJson(catalog.summary().await?))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}
