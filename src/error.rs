use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// AppError
///
/// The full error taxonomy of the API. Everything a handler can fail with is
/// one of these variants; the `IntoResponse` impl is the single place where
/// failures are mapped to HTTP statuses.
#[derive(Error, Debug)]
pub enum AppError {
    /// No session cookie, or the token failed signature/expiry validation.
    #[error("unauthorized access")]
    Unauthenticated,

    /// Authenticated, but the caller's identity does not match the identity
    /// implied by the query.
    #[error("forbidden access")]
    Forbidden,

    /// The id did not resolve to a record.
    #[error("not found")]
    NotFound,

    /// A store operation failed. Fatal for this call only; no retry.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Token signing failed at issuance. Practically unreachable with an
    /// HMAC secret, but kept explicit so no handler has to panic.
    #[error("token signing failure: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Persistence(ref e) => {
                // Details go to the log; the client gets a generic message.
                tracing::error!("store operation failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::TokenSigning(ref e) => {
                tracing::error!("token signing failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
