//! Key-value store database schema.

/// SQL to create the key-value table. Mirrors the first migration.
pub const CREATE_KV_STORE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
