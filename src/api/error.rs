use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Handler-boundary error taxonomy. Every variant is recovered into a JSON
/// `{"message": "..."}` response; none is fatal to the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing required field -> 400
    #[error("{0}")]
    Validation(String),

    /// Duplicate username or comic name -> 400
    #[error("{0}")]
    Conflict(String),

    /// Missing/invalid token or bad credentials -> 401
    #[error("{0}")]
    Auth(String),

    /// Unknown username -> 404
    #[error("{0}")]
    NotFound(String),
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
