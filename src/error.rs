//! Request-level error type.
//!
//! Services return `Result<T, AppError>` and handlers propagate it with `?`;
//! the `IntoResponse` impl maps each variant onto a status code and a
//! `{"error": "..."}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB driver failure. Details are logged, the client gets a generic 500.
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    /// A value could not be converted to BSON for an update document.
    #[error(transparent)]
    BsonSerialize(#[from] bson::ser::Error),

    /// A stored document did not match its model.
    #[error(transparent)]
    BsonDeserialize(#[from] bson::de::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The write would violate a uniqueness rule (taken username, achievement
    /// already unlocked).
    #[error("{0}")]
    Conflict(String),
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::BsonSerialize(_) | AppError::BsonDeserialize(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
