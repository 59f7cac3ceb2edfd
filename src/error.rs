//! Error types for the price monitor
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Upstream Error ==
/// Failure talking to the prices API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Non-2xx response
    #[error("{endpoint}: {status}")]
    Status { endpoint: String, status: u16 },

    /// Connection, timeout or client construction failure
    #[error("{endpoint}: request failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the expected JSON
    #[error("{endpoint}: invalid response body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

// == App Error ==
/// Error returned by request handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, AppError>;
