use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Internal server error")]
    Internal,
    #[error("Image not found")]
    ImageNotFound,
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("Unable to scan upload directory")]
    ScanFailed,
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Internal | ApiError::ScanFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ImageNotFound => StatusCode::NOT_FOUND,
            ApiError::NoFileUploaded | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // The by-name lookup answers in plain text, everything else in JSON.
        if let ApiError::ImageNotFound = self {
            return (status, self.to_string()).into_response();
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
