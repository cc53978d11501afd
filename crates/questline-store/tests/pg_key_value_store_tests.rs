//! Integration tests for `PgKeyValueStore`.

use questline_core::store::KeyValueStore;
use questline_store::pg_key_value_store::PgKeyValueStore;
use sqlx::PgPool;

// --- get ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_get_returns_none_for_missing_key(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    let value = store.get("questline:game_info").await.unwrap();

    assert!(value.is_none());
}

// --- set + get round-trip ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_set_then_get_returns_value(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    store.set("questline:game_info", r#"{"teams":[]}"#).await.unwrap();

    let value = store.get("questline:game_info").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"teams":[]}"#));
}

// --- last writer wins ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_set_overwrites_previous_value(pool: PgPool) {
    let store = PgKeyValueStore::new(pool.clone());

    store.set("k", "first").await.unwrap();
    store.set("k", "second").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("second"));
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store WHERE key = 'k'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_keys_are_independent(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    store.set("a", "1").await.unwrap();
    store.set("b", "2").await.unwrap();

    assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
}

// --- schema ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_ensure_schema_is_idempotent(pool: PgPool) {
    let store = PgKeyValueStore::new(pool);

    store.ensure_schema().await.unwrap();
    store.ensure_schema().await.unwrap();
    store.set("k", "v").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}
