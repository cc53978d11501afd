//! `PostgreSQL` implementation of the `KeyValueStore` trait.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use questline_core::error::DomainError;
use questline_core::store::KeyValueStore;

use crate::schema::CREATE_KV_STORE_TABLE;

/// PostgreSQL-backed key-value store.
#[derive(Debug, Clone)]
pub struct PgKeyValueStore {
    pool: PgPool,
}

impl PgKeyValueStore {
    /// Creates a new `PgKeyValueStore`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `kv_store` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_KV_STORE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;
        Ok(())
    }
}

fn infrastructure(err: &sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))?;
        debug!(key, found = row.is_some(), "kv get");
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;
        debug!(key, bytes = value.len(), "kv set");
        Ok(())
    }
}
