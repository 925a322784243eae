//! Account module: three-layer architecture (errors, repository, service).
//!
//! `AccountService` turns a raw access token into an [`Identity`](crate::token::Identity)
//! and runs the requested preference/product operation scoped to it.

pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;

pub use errors::{AccessError, StoreError};
pub use repository::AccountRepository;
pub use service::AccountService;
