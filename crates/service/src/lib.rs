//! Service layer: token validation and the account use cases built on it.
//! - `token` turns bearer tokens into identities.
//! - `account` holds the record store contract, its sea-orm implementation
//!   and the token-gated orchestration.

pub mod token;
pub mod account;
#[cfg(test)]
pub mod test_support;
