//! `PostgreSQL` storage for the registry snapshot.

pub mod pg_key_value_store;
pub mod schema;
