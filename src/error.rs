use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::clients::ClientError;
use crate::db::StoreError;

/// JSON error body returned by every endpoint.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub(crate) struct ApiError {
    message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Geocode(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("upstream error: {0}")]
    Upstream(#[from] ClientError),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn device_not_found() -> Self {
        Self::NotFound("Device not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Geocode(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey(key) => {
                Self::Conflict(format!("Device key '{key}' is already registered"))
            }
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiError { message })).into_response()
    }
}
