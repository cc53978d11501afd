//! The persisted JSON document and its conversion to and from a `Registry`.
//!
//! The layout keeps the stored key names of earlier deployments
//! (`to_visit_list`, `team_on_station`, ...) so existing entries load as is.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use questline_core::error::DomainError;
use questline_core::identity::Identity;
use serde::{Deserialize, Serialize};

use super::config::MAX_CARETAKERS_PER_STATION;
use super::ids::StationId;
use super::location::Location;
use super::registry::Registry;
use super::station::{Occupancy, Station};
use super::team::Team;

/// A station as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Station id, `<location>-<index>`.
    pub name: StationId,
    /// Stored occupancy (`Free`, `Waiting`, `In progress`).
    pub status: Occupancy,
}

/// A location as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Location name.
    pub name: String,
    /// Stations in creation order.
    pub stations: Vec<StationRecord>,
}

/// A team as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    /// Team name.
    pub name: String,
    /// Locations still to visit.
    pub to_visit_list: Vec<String>,
    /// Locations visited.
    #[serde(default)]
    pub visited_list: Vec<String>,
}

/// The full registry state under one key-value entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Caretaker identity → station.
    pub caretakers: BTreeMap<Identity, StationId>,
    /// Admin identities.
    pub admins: BTreeSet<Identity>,
    /// Locations in routing order.
    pub locations: Vec<LocationRecord>,
    /// Teams in registration order.
    pub teams: Vec<TeamRecord>,
    /// Current team per station.
    pub team_on_station: BTreeMap<StationId, Option<String>>,
    /// Departing team per station.
    pub team_leaving_station: BTreeMap<StationId, Option<String>>,
}

impl SnapshotDocument {
    /// Parses a stored document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LoadFailure` if the text is not a well-formed
    /// document.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::LoadFailure(format!("malformed snapshot: {e}")))
    }

    /// Renders the document for storage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SaveFailure` if serialization fails.
    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string(self)
            .map_err(|e| DomainError::SaveFailure(format!("snapshot serialization failed: {e}")))
    }

    /// Location names and station counts, for comparing against configuration.
    #[must_use]
    pub fn layout(&self) -> Vec<(&str, usize)> {
        self.locations
            .iter()
            .map(|l| (l.name.as_str(), l.stations.len()))
            .collect()
    }
}

fn corrupt(reason: impl Into<String>) -> DomainError {
    DomainError::LoadFailure(reason.into())
}

impl Registry {
    /// Captures the full state as a storable document.
    #[must_use]
    pub fn to_snapshot(&self) -> SnapshotDocument {
        let locations = self
            .locations()
            .iter()
            .map(|location| LocationRecord {
                name: location.name().to_owned(),
                stations: location
                    .stations()
                    .iter()
                    .map(|s| StationRecord {
                        name: s.id().clone(),
                        status: s.occupancy(),
                    })
                    .collect(),
            })
            .collect();

        let teams = self
            .teams()
            .iter()
            .map(|t| TeamRecord {
                name: t.name().to_owned(),
                to_visit_list: t.to_visit().to_vec(),
                visited_list: t.visited().to_vec(),
            })
            .collect();

        SnapshotDocument {
            caretakers: self.caretakers().clone(),
            admins: self.admins().clone(),
            locations,
            teams,
            team_on_station: self
                .stations()
                .map(|s| (s.id().clone(), s.current_team().map(str::to_owned)))
                .collect(),
            team_leaving_station: self
                .stations()
                .map(|s| (s.id().clone(), s.departing_team().map(str::to_owned)))
                .collect(),
        }
    }

    /// Rebuilds a registry from a stored document, validating it against
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LoadFailure` when the document contradicts
    /// itself: duplicate names, stations or teams referenced but not
    /// defined, a team in two slots of the same kind, a `Free` station with a
    /// current team, overlapping to-visit and visited lists, team lists
    /// naming locations that do not exist, or more teams than stations.
    pub fn from_snapshot(document: SnapshotDocument) -> Result<Self, DomainError> {
        let SnapshotDocument {
            caretakers,
            admins,
            locations,
            teams,
            mut team_on_station,
            mut team_leaving_station,
        } = document;

        let mut team_names = HashSet::new();
        let teams = teams
            .into_iter()
            .map(|record| {
                if !team_names.insert(record.name.clone()) {
                    return Err(corrupt(format!("team {} is listed twice", record.name)));
                }
                let name = record.name.clone();
                Team::restore(record.name, record.to_visit_list, record.visited_list).ok_or_else(
                    || corrupt(format!("team {name} repeats a location in its lists")),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut location_names = HashSet::new();
        let mut station_ids = HashSet::new();
        let mut restored = Vec::with_capacity(locations.len());
        for record in locations {
            if !location_names.insert(record.name.clone()) {
                return Err(corrupt(format!("location {} is listed twice", record.name)));
            }
            let mut stations = Vec::with_capacity(record.stations.len());
            for station in record.stations {
                let id = station.name;
                if id.location() != record.name {
                    return Err(corrupt(format!(
                        "station {id} is listed under location {}",
                        record.name
                    )));
                }
                if !station_ids.insert(id.clone()) {
                    return Err(corrupt(format!("station {id} is listed twice")));
                }
                let current = team_on_station.remove(&id).flatten();
                let departing = team_leaving_station.remove(&id).flatten();
                for team in current.iter().chain(&departing) {
                    if !team_names.contains(team) {
                        return Err(corrupt(format!(
                            "station {id} references unknown team {team}"
                        )));
                    }
                }
                let restored_station = Station::restore(id.clone(), station.status, current, departing)
                    .ok_or_else(|| corrupt(format!("free station {id} has a current team")))?;
                stations.push(restored_station);
            }
            restored.push(Location::from_stations(record.name, stations));
        }

        for team in &teams {
            if let Some(unknown) = team
                .to_visit()
                .iter()
                .chain(team.visited())
                .find(|location| !location_names.contains(*location))
            {
                return Err(corrupt(format!(
                    "team {} lists unknown location {unknown}",
                    team.name()
                )));
            }
        }

        if let Some(id) = team_on_station.keys().chain(team_leaving_station.keys()).next() {
            return Err(corrupt(format!("unknown station {id} in presence maps")));
        }

        let mut per_station: BTreeMap<&StationId, usize> = BTreeMap::new();
        for (caretaker, station) in &caretakers {
            if !station_ids.contains(station) {
                return Err(corrupt(format!(
                    "caretaker {caretaker} is assigned to unknown station {station}"
                )));
            }
            let count = per_station.entry(station).or_default();
            *count += 1;
            if *count > MAX_CARETAKERS_PER_STATION {
                return Err(corrupt(format!("station {station} has too many caretakers")));
            }
        }

        let registry = Self::assemble(restored, teams, caretakers, admins);
        registry.verify_invariants().map_err(corrupt)?;
        Ok(registry)
    }
}
