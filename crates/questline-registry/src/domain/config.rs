//! Initial game configuration: locations, caretakers and admins.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use questline_core::error::DomainError;
use questline_core::identity::Identity;
use serde::Deserialize;

use super::ids::StationId;

/// Maximum caretakers that may cover one station.
pub const MAX_CARETAKERS_PER_STATION: usize = 2;

/// One configured location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationConfig {
    /// Location name.
    pub name: String,
    /// Number of stations (`name-1 … name-N`).
    pub stations: u32,
}

/// Game configuration as read from a file. Order of `locations` is the
/// routing scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Locations in routing order.
    pub locations: Vec<LocationConfig>,
    /// Caretaker identity → station id.
    #[serde(default)]
    pub caretakers: BTreeMap<Identity, StationId>,
    /// Identities with override authority.
    #[serde(default)]
    pub admins: BTreeSet<Identity>,
}

impl GameConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if a location name is empty,
    /// padded with whitespace or repeated, a location has no stations, a caretaker points at a station
    /// that does not exist, or more than two caretakers share a station.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.locations.is_empty() {
            return Err(DomainError::InvalidConfig(
                "at least one location is required".into(),
            ));
        }

        let mut names = HashSet::new();
        for location in &self.locations {
            if location.name.trim().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "location names must not be empty".into(),
                ));
            }
            if location.name.trim() != location.name {
                return Err(DomainError::InvalidConfig(format!(
                    "location name {:?} has surrounding whitespace",
                    location.name
                )));
            }
            if !names.insert(location.name.as_str()) {
                return Err(DomainError::InvalidConfig(format!(
                    "location {} is listed twice",
                    location.name
                )));
            }
            if location.stations == 0 {
                return Err(DomainError::InvalidConfig(format!(
                    "location {} has no stations",
                    location.name
                )));
            }
        }

        let mut per_station: BTreeMap<&StationId, usize> = BTreeMap::new();
        for (caretaker, station) in &self.caretakers {
            if !self.has_station(station) {
                return Err(DomainError::InvalidConfig(format!(
                    "caretaker {caretaker} is assigned to unknown station {station}"
                )));
            }
            let count = per_station.entry(station).or_default();
            *count += 1;
            if *count > MAX_CARETAKERS_PER_STATION {
                return Err(DomainError::InvalidConfig(format!(
                    "station {station} has more than {MAX_CARETAKERS_PER_STATION} caretakers"
                )));
            }
        }

        Ok(())
    }

    /// Total station count across all locations.
    #[must_use]
    pub fn station_count(&self) -> usize {
        self.locations.iter().map(|l| l.stations as usize).sum()
    }

    fn has_station(&self, station: &StationId) -> bool {
        self.locations
            .iter()
            .any(|l| l.name == station.location() && (1..=l.stations).contains(&station.index()))
    }
}
