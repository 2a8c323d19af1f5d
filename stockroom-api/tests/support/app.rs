#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use stockroom_api::{create_api_router, ApiConfig, AppState};
use stockroom_test_utils::InMemoryRecordStore;
use tower::ServiceExt;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// A router over a fresh memory store, plus a handle on that store.
pub fn test_app() -> (Router, InMemoryRecordStore) {
    let store = InMemoryRecordStore::new();
    let state = AppState::new(Arc::new(store.clone()), ApiConfig::default());
    (create_api_router(state), store)
}

/// Send one request and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> TestResult<(StatusCode, serde_json::Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

/// Send a raw body with a JSON content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: &'static str,
) -> TestResult<(StatusCode, serde_json::Value)> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

pub fn id_of(json: &serde_json::Value) -> TestResult<String> {
    json["_id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("no _id in {}", json).into())
}
