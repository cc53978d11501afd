//! Questline Core: shared domain abstractions.
//!
//! This crate defines the error type, identities, event metadata, and the
//! key-value store contract that the registry and its adapters depend on.
//! It contains no infrastructure code.

pub mod command;
pub mod error;
pub mod event;
pub mod identity;
pub mod store;
