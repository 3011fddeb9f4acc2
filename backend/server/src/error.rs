use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    /// Bad input, answered as `{ error }`.
    #[error("{0}")]
    Validation(&'static str),

    /// Bad answer on the goal and drinks pages, answered as
    /// `{ success: false, message }` since those pages read the flag.
    #[error("{0}")]
    Rejected(&'static str),

    #[error("{0}")]
    NotFound(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) | AppError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            AppError::Rejected(message) => json!({
                "success": false,
                "message": message,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (self.status(), Json(body)).into_response()
    }
}
