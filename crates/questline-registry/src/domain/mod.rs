//! Domain model: stations, locations, teams and the registry aggregate.

mod admin;
pub mod commands;
pub mod config;
pub mod events;
pub mod ids;
pub mod location;
pub mod notifications;
pub mod outcomes;
pub mod registry;
pub mod roles;
mod routing;
pub mod snapshot;
pub mod station;
pub mod team;
