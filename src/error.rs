use thiserror::Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Make our own error that wraps `anyhow::Error`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// anything unexpected, surfaced as a 500
    #[error("internal")]
    Internal(#[from] anyhow::Error),
    /// a bare http status
    #[error("status code")]
    Status(StatusCode),
}

// Tell axum how to convert `ApiError` into a response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Something went wrong: {e}"))
                    .into_response()
            }
            Self::Status(sc) => sc.into_response(),
        }
    }
}

// This enables using `?` on functions that return `Result<_, StatusCode>` to turn them into
// `Result<_, ApiError>`. That way you don't need to do that manually.
impl From<StatusCode> for ApiError {
    fn from(sc: StatusCode) -> Self {
        Self::Status(sc)
    }
}
