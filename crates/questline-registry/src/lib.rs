//! Questline: station assignment and quest routing.
//!
//! Owns the registry of stations, locations and teams, and the two-phase
//! handoff that moves a team from the station it is leaving to the next free
//! station in a location it still has to visit. All mutation is serialized
//! through a single worker task; callers talk to it via [`RegistryHandle`].
//!
//! [`RegistryHandle`]: application::handle::RegistryHandle

pub mod application;
pub mod domain;
