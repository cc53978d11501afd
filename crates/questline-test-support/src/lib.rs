//! Shared test doubles and fixtures for the Questline station-routing engine.

mod clock;
mod fixtures;
mod store;

pub use clock::FixedClock;
pub use fixtures::{TWO_LOCATION_CONFIG, three_location_config, two_location_config};
pub use store::{EmptyKeyValueStore, FailingKeyValueStore, InMemoryKeyValueStore};
