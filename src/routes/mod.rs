pub mod devices;
pub mod users;

use axum::{
    body::Bytes,
    extract::rejection::JsonRejection,
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", devices::router().merge(users::router()))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Unwraps a JSON body, turning extractor rejections into validation errors.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::validation(e.body_text()))
}

/// Like [`json_body`] for steps where the body may be left out entirely.
pub(crate) fn optional_json_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::validation(e.to_string()))
}
