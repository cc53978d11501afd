//! Query handlers for the registry.
//!
//! Read-only views built from a registry copy taken through the worker, so
//! each view reflects one consistent moment.

use questline_core::error::DomainError;
use serde::Serialize;

use crate::domain::ids::StationId;
use crate::domain::registry::Registry;
use crate::domain::roles::CaretakerPair;
use crate::domain::station::{Occupancy, Station};
use crate::domain::team::Team;

/// Read-only view of a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationView {
    /// The station id.
    pub station: StationId,
    /// Current occupancy.
    pub occupancy: Occupancy,
    /// Team arriving or working here.
    pub current_team: Option<String>,
    /// Previous occupant awaiting routing.
    pub departing_team: Option<String>,
    /// Caretakers of the station.
    pub caretakers: CaretakerPair,
}

/// Read-only view of a location and its stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationView {
    /// Location name.
    pub name: String,
    /// Stations in creation order.
    pub stations: Vec<StationView>,
}

/// Where a team currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "station", rename_all = "snake_case")]
pub enum Whereabouts {
    /// On its way to a station.
    Arriving(StationId),
    /// Working a station.
    Working(StationId),
    /// Left a station and awaits routing.
    Departing(StationId),
    /// In no station slot with locations left to visit.
    Unassigned,
    /// Nothing left to visit.
    Complete,
}

/// Read-only view of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamView {
    /// Team name.
    pub name: String,
    /// Locations still to visit.
    pub to_visit: Vec<String>,
    /// Locations visited.
    pub visited: Vec<String>,
    /// Where the team is now.
    pub whereabouts: Whereabouts,
}

/// Registered team count against total station count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrationCapacity {
    /// Teams registered.
    pub teams: usize,
    /// Total stations.
    pub stations: usize,
    /// Teams that may still register.
    pub remaining: usize,
}

fn station_view(registry: &Registry, station: &Station) -> StationView {
    StationView {
        station: station.id().clone(),
        occupancy: station.occupancy(),
        current_team: station.current_team().map(str::to_owned),
        departing_team: station.departing_team().map(str::to_owned),
        caretakers: registry.caretaker_pair(station.id()),
    }
}

fn whereabouts(registry: &Registry, team: &Team) -> Whereabouts {
    if let Some(station) = registry.current_station_of(team.name()) {
        let working = registry
            .station(station)
            .is_ok_and(|s| s.occupancy() == Occupancy::Working);
        return if working {
            Whereabouts::Working(station.clone())
        } else {
            Whereabouts::Arriving(station.clone())
        };
    }
    if let Some(station) = registry.departing_station_of(team.name()) {
        return Whereabouts::Departing(station.clone());
    }
    if team.is_complete() {
        Whereabouts::Complete
    } else {
        Whereabouts::Unassigned
    }
}

fn team_view(registry: &Registry, team: &Team) -> TeamView {
    TeamView {
        name: team.name().to_owned(),
        to_visit: team.to_visit().to_vec(),
        visited: team.visited().to_vec(),
        whereabouts: whereabouts(registry, team),
    }
}

/// Every location with its stations, in configuration order.
#[must_use]
pub fn stations_by_location(registry: &Registry) -> Vec<LocationView> {
    registry
        .locations()
        .iter()
        .map(|location| LocationView {
            name: location.name().to_owned(),
            stations: location
                .stations()
                .iter()
                .map(|s| station_view(registry, s))
                .collect(),
        })
        .collect()
}

/// One station with its teams and caretakers.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation` if no such station exists.
pub fn get_station(registry: &Registry, id: &StationId) -> Result<StationView, DomainError> {
    Ok(station_view(registry, registry.station(id)?))
}

/// Every team, in registration order.
#[must_use]
pub fn teams_snapshot(registry: &Registry) -> Vec<TeamView> {
    registry
        .teams()
        .iter()
        .map(|t| team_view(registry, t))
        .collect()
}

/// One team with its lists and whereabouts.
///
/// # Errors
///
/// Returns `DomainError::UnknownTeam` if no team has that name.
pub fn get_team(registry: &Registry, name: &str) -> Result<TeamView, DomainError> {
    Ok(team_view(registry, registry.team(name)?))
}

/// A team's remaining locations, in order.
///
/// # Errors
///
/// Returns `DomainError::UnknownTeam` if no team has that name.
pub fn team_to_visit(registry: &Registry, name: &str) -> Result<Vec<String>, DomainError> {
    Ok(registry.team(name)?.to_visit().to_vec())
}

/// Teams needing manual reassignment.
#[must_use]
pub fn unassigned_teams(registry: &Registry) -> Vec<TeamView> {
    registry
        .find_unassigned_teams()
        .into_iter()
        .map(|t| team_view(registry, t))
        .collect()
}

/// How many more teams may register.
#[must_use]
pub fn registration_capacity(registry: &Registry) -> RegistrationCapacity {
    let (teams, stations) = registry.capacity();
    RegistrationCapacity {
        teams,
        stations,
        remaining: stations.saturating_sub(teams),
    }
}
