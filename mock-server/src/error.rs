use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Handler failures, rendered as `{"detail": ...}` bodies.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Post not found")]
    NotFound,
    #[error("Not allowed")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Forbidden => StatusCode::FORBIDDEN,
            ServerError::BadRequest(_) | ServerError::Multipart(_) => StatusCode::BAD_REQUEST,
            ServerError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;
