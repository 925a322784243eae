use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use service::account::{AccessError, StoreError};

/// RPC-facing error: an [`AccessError`] mapped onto an HTTP status.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AccessError);

impl ApiError {
    pub fn unauthorized() -> Self {
        Self(AccessError::Unauthorized)
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AccessError::Unauthorized => StatusCode::UNAUTHORIZED,
            AccessError::Store(StoreError::PreferenceNotFound | StoreError::ProductNotFound) => StatusCode::NOT_FOUND,
            AccessError::Store(StoreError::ProductAlreadyExists) => StatusCode::CONFLICT,
            AccessError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. Storage fault details stay in the logs.
    fn public_message(&self) -> String {
        match &self.0 {
            AccessError::Store(StoreError::PreferenceWriteFailed(_)) => "preference write failed".into(),
            AccessError::Store(StoreError::QueryFailed(_)) => "query failed".into(),
            AccessError::Store(StoreError::RowDecodeFailed(_)) => "row decode failed".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, code = self.0.code(), "rpc failed");
        }
        let body = serde_json::json!({"error": self.public_message(), "code": self.0.code()});
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_access_errors_to_status() {
        assert_eq!(ApiError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError(StoreError::PreferenceNotFound.into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError(StoreError::ProductNotFound.into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError(StoreError::ProductAlreadyExists.into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError(StoreError::RowDecodeFailed("bad utf8".into()).into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn fault_details_are_not_exposed() {
        let err = ApiError(StoreError::QueryFailed("password authentication failed for user".into()).into());
        assert_eq!(err.public_message(), "query failed");
    }
}
