use std::collections::BTreeSet;

use async_trait::async_trait;

use super::errors::StoreError;
use crate::token::Identity;

/// Repository abstraction for per-user preference and product persistence.
///
/// Every operation is scoped by the caller's [`Identity`]; nothing here can
/// read or write another user's rows.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Product names owned by `id`. Empty when the user has none.
    async fn list_products(&self, id: Identity) -> Result<BTreeSet<String>, StoreError>;
    async fn get_preference(&self, id: Identity) -> Result<String, StoreError>;
    /// Insert the preference, or overwrite it when one already exists.
    async fn upsert_preference(&self, id: Identity, value: &str) -> Result<(), StoreError>;
    /// Fails with `PreferenceNotFound` when there was nothing to delete.
    async fn remove_preference(&self, id: Identity) -> Result<(), StoreError>;
    async fn add_product(&self, id: Identity, name: &str) -> Result<(), StoreError>;
    async fn remove_product(&self, id: Identity, name: &str) -> Result<(), StoreError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAccountRepository {
        preferences: Mutex<HashMap<Identity, String>>,
        products: Mutex<HashMap<Identity, BTreeSet<String>>>,
        calls: AtomicUsize,
        fault: Mutex<Option<StoreError>>,
    }

    fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl MockAccountRepository {
        /// Number of repository calls made so far, successful or not.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Make every following call fail with `err` (storage fault simulation).
        pub fn fail_with(&self, err: StoreError) {
            *guard(&self.fault) = Some(err);
        }

        /// Number of stored preference rows across all users.
        pub fn preference_rows(&self) -> usize {
            guard(&self.preferences).len()
        }

        fn enter(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match guard(&self.fault).clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn list_products(&self, id: Identity) -> Result<BTreeSet<String>, StoreError> {
            self.enter()?;
            Ok(guard(&self.products).get(&id).cloned().unwrap_or_default())
        }

        async fn get_preference(&self, id: Identity) -> Result<String, StoreError> {
            self.enter()?;
            guard(&self.preferences).get(&id).cloned().ok_or(StoreError::PreferenceNotFound)
        }

        async fn upsert_preference(&self, id: Identity, value: &str) -> Result<(), StoreError> {
            self.enter()?;
            guard(&self.preferences).insert(id, value.to_string());
            Ok(())
        }

        async fn remove_preference(&self, id: Identity) -> Result<(), StoreError> {
            self.enter()?;
            guard(&self.preferences).remove(&id).map(|_| ()).ok_or(StoreError::PreferenceNotFound)
        }

        async fn add_product(&self, id: Identity, name: &str) -> Result<(), StoreError> {
            self.enter()?;
            let mut products = guard(&self.products);
            if products.entry(id).or_default().insert(name.to_string()) {
                Ok(())
            } else {
                Err(StoreError::ProductAlreadyExists)
            }
        }

        async fn remove_product(&self, id: Identity, name: &str) -> Result<(), StoreError> {
            self.enter()?;
            let mut products = guard(&self.products);
            match products.get_mut(&id).map(|set| set.remove(name)) {
                Some(true) => Ok(()),
                _ => Err(StoreError::ProductNotFound),
            }
        }
    }
}
