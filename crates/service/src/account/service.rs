use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::errors::{AccessError, StoreError};
use super::repository::AccountRepository;
use crate::token::{Identity, TokenVerifier};

/// Account use cases gated by the caller's access token.
///
/// Stateless across calls: each operation authenticates the token, then runs
/// exactly one repository call scoped to the resulting identity. Token failures
/// surface as [`AccessError::Unauthorized`] and the repository is not touched;
/// repository errors pass through unchanged.
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    tokens: Arc<dyn TokenVerifier>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, tokens: Arc<dyn TokenVerifier>) -> Self {
        Self { repo, tokens }
    }

    fn authenticate(&self, access_token: &str) -> Result<Identity, AccessError> {
        self.tokens.validate(access_token).map_err(|e| {
            debug!(reason = %e, code = e.code(), "access token rejected");
            AccessError::Unauthorized
        })
    }

    fn log_store_error(op: &'static str, id: Identity, err: &StoreError) {
        if err.is_fault() {
            warn!(op, user_id = %id, error = %err, code = err.code(), "account store fault");
        } else {
            debug!(op, user_id = %id, error = %err, code = err.code(), "account store rejected request");
        }
    }

    /// List the caller's products.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::account::{AccountService, AccessError, repository::mock::MockAccountRepository};
    /// use service::token::JwtTokenVerifier;
    /// let repo = Arc::new(MockAccountRepository::default());
    /// let svc = AccountService::new(repo.clone(), Arc::new(JwtTokenVerifier::new("secret").unwrap()));
    /// let res = tokio_test::block_on(svc.get_products("not-a-token"));
    /// assert_eq!(res, Err(AccessError::Unauthorized));
    /// assert_eq!(repo.calls(), 0);
    /// ```
    #[instrument(skip_all)]
    pub async fn get_products(&self, access_token: &str) -> Result<BTreeSet<String>, AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.list_products(id).await.map_err(|e| {
            Self::log_store_error("get_products", id, &e);
            e.into()
        })
    }

    #[instrument(skip_all)]
    pub async fn get_preference(&self, access_token: &str) -> Result<String, AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.get_preference(id).await.map_err(|e| {
            Self::log_store_error("get_preference", id, &e);
            e.into()
        })
    }

    /// Create the caller's preference, or overwrite it when one exists.
    #[instrument(skip_all)]
    pub async fn upsert_preference(&self, access_token: &str, preference_name: &str) -> Result<(), AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.upsert_preference(id, preference_name).await.map_err(|e| {
            Self::log_store_error("upsert_preference", id, &e);
            AccessError::from(e)
        })?;
        info!(user_id = %id, "preference_updated");
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn remove_preference(&self, access_token: &str) -> Result<(), AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.remove_preference(id).await.map_err(|e| {
            Self::log_store_error("remove_preference", id, &e);
            AccessError::from(e)
        })?;
        info!(user_id = %id, "preference_removed");
        Ok(())
    }

    #[instrument(skip_all, fields(product_name = %product_name))]
    pub async fn add_product(&self, access_token: &str, product_name: &str) -> Result<(), AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.add_product(id, product_name).await.map_err(|e| {
            Self::log_store_error("add_product", id, &e);
            AccessError::from(e)
        })?;
        info!(user_id = %id, "product_added");
        Ok(())
    }

    #[instrument(skip_all, fields(product_name = %product_name))]
    pub async fn remove_product(&self, access_token: &str, product_name: &str) -> Result<(), AccessError> {
        let id = self.authenticate(access_token)?;
        self.repo.remove_product(id, product_name).await.map_err(|e| {
            Self::log_store_error("remove_product", id, &e);
            AccessError::from(e)
        })?;
        info!(user_id = %id, "product_removed");
        Ok(())
    }
}
