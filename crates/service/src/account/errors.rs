use thiserror::Error;

/// Record store failures. These reach the transport layer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("preference not found")]
    PreferenceNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("product already exists")]
    ProductAlreadyExists,
    #[error("preference write failed: {0}")]
    PreferenceWriteFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("row decode failed: {0}")]
    RowDecodeFailed(String),
}

impl StoreError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::PreferenceNotFound => 3001,
            StoreError::ProductNotFound => 3002,
            StoreError::ProductAlreadyExists => 3003,
            StoreError::PreferenceWriteFailed(_) => 3101,
            StoreError::QueryFailed(_) => 3102,
            StoreError::RowDecodeFailed(_) => 3103,
        }
    }

    /// Whether this is a storage fault rather than a caller-visible outcome.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            StoreError::PreferenceWriteFailed(_) | StoreError::QueryFailed(_) | StoreError::RowDecodeFailed(_)
        )
    }
}

/// Errors returned by [`AccountService`](super::AccountService).
///
/// Token failures collapse into `Unauthorized`; the reason is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccessError {
    pub fn code(&self) -> u16 {
        match self {
            AccessError::Unauthorized => 1004,
            AccessError::Store(e) => e.code(),
        }
    }
}
