//! Key-value store abstraction used by the persistence adapter.
//!
//! The registry snapshot lives under a single key. Only get/set semantics
//! matter: last writer wins, no transactions, no diffing.

use async_trait::async_trait;

use crate::error::DomainError;

/// A string-valued key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
