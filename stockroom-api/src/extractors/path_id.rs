//! Path extractors for typed record ids.
//!
//! `PathId<T>` parses a path segment into a `RecordIdType` newtype and
//! rejects malformed ids with 400 before any handler (and so any store
//! lookup) runs.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use stockroom_core::RecordIdType;

use crate::error::ApiError;

/// Extractor for a single typed record id.
///
/// ```rust,ignore
/// async fn get_component(PathId(id): PathId<ComponentId>) -> ApiResult<Json<Component>> {
///     // id is a ComponentId, already validated
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PathId<T: RecordIdType>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: RecordIdType,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Bad path parameters: {}", e)))?;

        T::parse(&raw)
            .map(PathId)
            .map_err(|e| ApiError::invalid_identifier(T::ENTITY_NAME, &e))
    }
}

/// Extractor for two typed ids, e.g. `/products/:id/components/:entry_id`.
///
/// The first malformed segment decides the error message.
#[derive(Debug, Clone)]
pub struct PathIds<T>(pub T);

#[async_trait]
impl<S, T1, T2> FromRequestParts<S> for PathIds<(T1, T2)>
where
    S: Send + Sync,
    T1: RecordIdType,
    T2: RecordIdType,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((raw1, raw2)): Path<(String, String)> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_input(format!("Bad path parameters: {}", e)))?;

        let first = T1::parse(&raw1).map_err(|e| ApiError::invalid_identifier(T1::ENTITY_NAME, &e))?;
        let second =
            T2::parse(&raw2).map_err(|e| ApiError::invalid_identifier(T2::ENTITY_NAME, &e))?;
        Ok(PathIds((first, second)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use stockroom_core::{EntryId, ProductId};
    use tower::ServiceExt;

    async fn one(PathId(id): PathId<ProductId>) -> String {
        id.to_string()
    }

    async fn two(PathIds((product, entry)): PathIds<(ProductId, EntryId)>) -> String {
        format!("{}/{}", product, entry)
    }

    fn app() -> Router {
        Router::new()
            .route("/products/:id", get(one))
            .route("/products/:id/components/:entry_id", get(two))
    }

    async fn call(uri: &str) -> Result<axum::response::Response, Box<dyn std::error::Error>> {
        let request = Request::builder().uri(uri).body(axum::body::Body::empty())?;
        Ok(app().oneshot(request).await?)
    }

    #[tokio::test]
    async fn test_valid_ids_pass_through() -> Result<(), Box<dyn std::error::Error>> {
        let response = call("/products/65A1F0C2B3D4E5F60718293A").await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&body[..], b"65a1f0c2b3d4e5f60718293a");

        let response =
            call("/products/65a1f0c2b3d4e5f60718293a/components/65a1f0c2b3d4e5f60718293b").await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
        let response = call("/products/not-an-id").await?;
        assert_eq!(response.status(), ErrorCode::InvalidIdentifier.status_code());

        let response =
            call("/products/65a1f0c2b3d4e5f60718293a/components/123").await?;
        assert_eq!(response.status(), ErrorCode::InvalidIdentifier.status_code());
        Ok(())
    }
}
