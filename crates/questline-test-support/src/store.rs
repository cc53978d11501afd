//! Test stores: mock `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use questline_core::error::DomainError;
use questline_core::store::KeyValueStore;

/// An in-memory store that records every write in order.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one entry. The entry does not count as a write.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    /// Returns all `(key, value)` pairs written, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Returns the current value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A store with nothing in it that silently accepts writes. Useful for
/// cold-start scenarios.
#[derive(Debug)]
pub struct EmptyKeyValueStore;

#[async_trait]
impl KeyValueStore for EmptyKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
