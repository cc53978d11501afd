//! Application layer: command handlers, queries, persistence and the
//! single-writer worker that serializes every registry operation.

pub mod command_handlers;
pub mod handle;
pub mod persistence;
pub mod query_handlers;
mod worker;
