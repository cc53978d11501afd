//! Snapshot persistence through a key-value store.
//!
//! The whole registry is written under one key after every mutation
//! (last writer wins). A missing key means a cold start.

use std::sync::Arc;

use questline_core::error::DomainError;
use questline_core::store::KeyValueStore;
use tracing::{info, warn};

use crate::domain::config::GameConfig;
use crate::domain::registry::Registry;
use crate::domain::snapshot::SnapshotDocument;

/// Default key the snapshot is stored under.
pub const DEFAULT_STATE_KEY: &str = "questline:game_info";

/// Saves and loads the registry snapshot.
#[derive(Clone)]
pub struct SnapshotPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for SnapshotPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl SnapshotPersistence {
    /// Creates a persistence adapter writing under `key`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key snapshots are stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SaveFailure` if serialization or the store fails.
    pub async fn save(&self, registry: &Registry) -> Result<(), DomainError> {
        let raw = registry.to_snapshot().to_json()?;
        self.store
            .set(&self.key, &raw)
            .await
            .map_err(|e| DomainError::SaveFailure(e.to_string()))
    }

    /// Reads and validates the stored snapshot. `Ok(None)` means no prior
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LoadFailure` if the store fails or the document
    /// is malformed or inconsistent.
    pub async fn load(&self) -> Result<Option<Registry>, DomainError> {
        let Some(raw) = self
            .store
            .get(&self.key)
            .await
            .map_err(|e| DomainError::LoadFailure(e.to_string()))?
        else {
            return Ok(None);
        };
        let document = SnapshotDocument::from_json(&raw)?;
        Registry::from_snapshot(document).map(Some)
    }

    /// Restores the stored registry, or builds a fresh one from `config` on a
    /// cold start.
    ///
    /// A stored snapshot is authoritative even when its locations differ from
    /// the configuration; the difference is logged.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LoadFailure` for an unreadable snapshot and
    /// `DomainError::InvalidConfig` for an invalid cold-start configuration.
    pub async fn restore_or_init(&self, config: &GameConfig) -> Result<Registry, DomainError> {
        if let Some(registry) = self.load().await? {
            let configured: Vec<(&str, usize)> = config
                .locations
                .iter()
                .map(|l| (l.name.as_str(), l.stations as usize))
                .collect();
            let stored = registry.to_snapshot();
            if stored.layout() != configured {
                warn!(
                    key = %self.key,
                    "stored snapshot locations differ from configuration; using snapshot"
                );
            }
            info!(
                key = %self.key,
                teams = registry.teams().len(),
                "restored registry from snapshot"
            );
            return Ok(registry);
        }

        let registry = Registry::from_config(config)?;
        info!(
            key = %self.key,
            stations = registry.station_count(),
            "no stored snapshot; starting from configuration"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use questline_core::error::DomainError;
    use questline_test_support::{
        EmptyKeyValueStore, FailingKeyValueStore, InMemoryKeyValueStore, two_location_config,
    };

    use super::*;

    #[tokio::test]
    async fn test_save_then_load_restores_equivalent_registry() {
        // Arrange
        let store = Arc::new(InMemoryKeyValueStore::new());
        let persistence = SnapshotPersistence::new(store.clone(), DEFAULT_STATE_KEY);
        let mut registry = Registry::from_config(&two_location_config()).unwrap();
        registry.register_team("Owls").unwrap();

        // Act
        persistence.save(&registry).await.unwrap();
        let loaded = persistence.load().await.unwrap();

        // Assert
        assert_eq!(loaded, Some(registry));
        assert_eq!(store.writes().len(), 1);
        assert_eq!(store.writes()[0].0, DEFAULT_STATE_KEY);
    }

    #[tokio::test]
    async fn test_missing_key_is_a_cold_start() {
        let persistence = SnapshotPersistence::new(Arc::new(EmptyKeyValueStore), "k");

        let registry = persistence
            .restore_or_init(&two_location_config())
            .await
            .unwrap();

        assert!(registry.teams().is_empty());
        assert_eq!(registry.station_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_fatal() {
        let store = Arc::new(InMemoryKeyValueStore::with_entry("k", "{not json"));
        let persistence = SnapshotPersistence::new(store, "k");

        let result = persistence.restore_or_init(&two_location_config()).await;

        assert!(matches!(result, Err(DomainError::LoadFailure(_))));
    }

    #[tokio::test]
    async fn test_store_failure_on_save_is_save_failure() {
        let persistence = SnapshotPersistence::new(Arc::new(FailingKeyValueStore), "k");
        let registry = Registry::from_config(&two_location_config()).unwrap();

        let result = persistence.save(&registry).await;

        assert!(matches!(result, Err(DomainError::SaveFailure(_))));
    }

    #[tokio::test]
    async fn test_store_failure_on_load_is_load_failure() {
        let persistence = SnapshotPersistence::new(Arc::new(FailingKeyValueStore), "k");

        let result = persistence.load().await;

        assert!(matches!(result, Err(DomainError::LoadFailure(_))));
    }
}
