//! JSON body extractor with 400 rejections.
//!
//! axum's own `Json` answers type errors with 422 and a plain-text body.
//! Record coercion failures are validation errors here, so they get the
//! usual JSON error body and a 400.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                ApiError::validation_failed(err.body_text())
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::invalid_input(format!("Malformed JSON: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::invalid_input("Expected request with `Content-Type: application/json`")
            }
            other => ApiError::invalid_input(other.body_text()),
        }
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

impl<T: Serialize> IntoResponse for AppJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use stockroom_core::ComponentInput;
    use tower::ServiceExt;

    async fn echo(AppJson(input): AppJson<ComponentInput>) -> AppJson<ComponentInput> {
        AppJson(input)
    }

    async fn send(body: &'static str) -> Result<Response, Box<dyn std::error::Error>> {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;
        Ok(Router::new().route("/", post(echo)).oneshot(request).await?)
    }

    #[tokio::test]
    async fn test_accepts_coercible_body() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(r#"{"itemName":"R1","stockQuantity":"12"}"#).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json["stockQuantity"], 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_coercion_failure_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
        let response = send(r#"{"stockQuantity":"lots"}"#).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let err: ApiError = serde_json::from_slice(&body)?;
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        Ok(())
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() -> Result<(), Box<dyn std::error::Error>> {
        let response = send("{not json").await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
