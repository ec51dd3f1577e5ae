//! API error type and its HTTP mapping.
//!
//! Error bodies are `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use parkyourlark_core::AdminServiceError;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Admin(#[from] AdminServiceError),
    #[error("blocking worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Admin(AdminServiceError::Parse(_)) => StatusCode::BAD_REQUEST,
            Self::Admin(AdminServiceError::Store(_)) | Self::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Admin(AdminServiceError::Parse(err)) => err.to_string(),
            Self::Admin(AdminServiceError::Store(err)) => {
                error!("event=http_error module=api status=error error_code=store_failed error={err}");
                "internal store error".to_string()
            }
            Self::Worker(err) => {
                error!("event=http_error module=api status=error error_code=worker_failed error={err}");
                "internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
