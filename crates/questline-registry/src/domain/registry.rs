//! The registry aggregate: single owner of stations, locations and teams.
//!
//! Stations and teams are addressed by id and never aliased across
//! components. `currentTeamOf` and `departingTeamOf` are read straight from
//! the stations' slots rather than kept as separate maps.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use questline_core::error::DomainError;
use questline_core::identity::Identity;

use super::config::GameConfig;
use super::ids::StationId;
use super::location::Location;
use super::outcomes::{Acceptance, Assignment};
use super::roles::{CaretakerPair, Role};
use super::station::{Occupancy, Station};
use super::team::Team;

/// The aggregate holding all stations, locations, teams and the
/// caretaker/admin tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub(crate) locations: Vec<Location>,
    station_index: HashMap<StationId, (usize, usize)>,
    pub(crate) teams: Vec<Team>,
    team_index: HashMap<String, usize>,
    caretakers: BTreeMap<Identity, StationId>,
    admins: BTreeSet<Identity>,
}

impl Registry {
    /// Builds an empty registry (no teams) from configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` if the configuration is invalid.
    pub fn from_config(config: &GameConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let locations = config
            .locations
            .iter()
            .map(|l| Location::new(l.name.clone(), l.stations))
            .collect();
        Ok(Self::assemble(
            locations,
            Vec::new(),
            config.caretakers.clone(),
            config.admins.clone(),
        ))
    }

    /// Builds a registry from already-validated parts and indexes it.
    pub(crate) fn assemble(
        locations: Vec<Location>,
        teams: Vec<Team>,
        caretakers: BTreeMap<Identity, StationId>,
        admins: BTreeSet<Identity>,
    ) -> Self {
        let station_index = locations
            .iter()
            .enumerate()
            .flat_map(|(li, location)| {
                location
                    .stations()
                    .iter()
                    .enumerate()
                    .map(move |(si, station)| (station.id().clone(), (li, si)))
            })
            .collect();
        let team_index = teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.name().to_owned(), i))
            .collect();
        Self {
            locations,
            station_index,
            teams,
            team_index,
            caretakers,
            admins,
        }
    }

    // ── Lookups ──

    /// Locations in configuration order.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Teams in registration order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Every station, locations in configuration order, stations in creation
    /// order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.locations.iter().flat_map(Location::stations)
    }

    /// Total station count.
    #[must_use]
    pub fn station_count(&self) -> usize {
        self.station_index.len()
    }

    /// Caretaker table (identity → station).
    #[must_use]
    pub fn caretakers(&self) -> &BTreeMap<Identity, StationId> {
        &self.caretakers
    }

    /// Admin identities.
    #[must_use]
    pub fn admins(&self) -> &BTreeSet<Identity> {
        &self.admins
    }

    /// Looks up a station.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` if no such station exists.
    pub fn station(&self, id: &StationId) -> Result<&Station, DomainError> {
        let &(li, si) = self
            .station_index
            .get(id)
            .ok_or_else(|| DomainError::UnknownStation(id.to_string()))?;
        Ok(&self.locations[li].stations()[si])
    }

    pub(crate) fn station_mut(&mut self, id: &StationId) -> Result<&mut Station, DomainError> {
        let &(li, si) = self
            .station_index
            .get(id)
            .ok_or_else(|| DomainError::UnknownStation(id.to_string()))?;
        Ok(&mut self.locations[li].stations_mut()[si])
    }

    /// Looks up a team by name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTeam` if no team has that name.
    pub fn team(&self, name: &str) -> Result<&Team, DomainError> {
        self.team_index
            .get(name)
            .map(|&i| &self.teams[i])
            .ok_or_else(|| DomainError::UnknownTeam(name.to_owned()))
    }

    pub(crate) fn team_mut(&mut self, name: &str) -> Result<&mut Team, DomainError> {
        match self.team_index.get(name) {
            Some(&i) => Ok(&mut self.teams[i]),
            None => Err(DomainError::UnknownTeam(name.to_owned())),
        }
    }

    /// Whether a location with this name exists.
    #[must_use]
    pub fn has_location(&self, name: &str) -> bool {
        self.locations.iter().any(|l| l.name() == name)
    }

    /// Station where `team` is currently arriving or working.
    #[must_use]
    pub fn current_station_of(&self, team: &str) -> Option<&StationId> {
        self.stations()
            .find(|s| s.current_team() == Some(team))
            .map(Station::id)
    }

    /// Station `team` is departing from, awaiting routing.
    #[must_use]
    pub fn departing_station_of(&self, team: &str) -> Option<&StationId> {
        self.stations()
            .find(|s| s.departing_team() == Some(team))
            .map(Station::id)
    }

    // ── Caretakers and roles ──

    /// Caretakers registered against `station`, as a fixed-size pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` if no such station exists.
    pub fn caretakers_of(&self, station: &StationId) -> Result<CaretakerPair, DomainError> {
        self.station(station)?;
        Ok(self.caretaker_pair(station))
    }

    pub(crate) fn caretaker_pair(&self, station: &StationId) -> CaretakerPair {
        CaretakerPair::collect(
            self.caretakers
                .iter()
                .filter(|(_, s)| *s == station)
                .map(|(identity, _)| identity),
        )
    }

    /// Station the caretaker is responsible for, or `None` if unregistered.
    #[must_use]
    pub fn station_of(&self, caretaker: &Identity) -> Option<&StationId> {
        self.caretakers.get(caretaker)
    }

    /// Resolves an identity to its role. Admin wins over caretaker.
    #[must_use]
    pub fn role_of(&self, identity: &Identity) -> Role {
        if self.admins.contains(identity) {
            Role::Admin
        } else if let Some(station) = self.station_of(identity) {
            Role::Caretaker(station.clone())
        } else {
            Role::Unknown
        }
    }

    // ── Registration ──

    /// Registers a team and sends it to the first empty station.
    ///
    /// Locations are scanned in configuration order and stations in creation
    /// order. The team starts with every location to visit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTeamName` for an empty name,
    /// `DomainError::DuplicateTeam` if the name is taken,
    /// `DomainError::CapacityExceeded` once there are as many teams as
    /// stations, and `DomainError::NoCapacity` if no station is empty.
    pub fn register_team(&mut self, name: &str) -> Result<Assignment, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidTeamName(name.to_owned()));
        }
        if self.team_index.contains_key(name) {
            return Err(DomainError::DuplicateTeam(name.to_owned()));
        }
        if self.teams.len() >= self.station_count() {
            return Err(DomainError::CapacityExceeded {
                teams: self.teams.len(),
                stations: self.station_count(),
            });
        }
        let station = self
            .locations
            .iter()
            .find_map(Location::first_empty_station)
            .map(|s| s.id().clone())
            .ok_or(DomainError::NoCapacity)?;

        let team = Team::new(name, self.locations.iter().map(|l| l.name().to_owned()));
        self.team_index.insert(name.to_owned(), self.teams.len());
        self.teams.push(team);

        self.station_mut(&station)?.assign(name.to_owned());
        Ok(Assignment {
            team: name.to_owned(),
            caretakers: self.caretaker_pair(&station),
            station,
        })
    }

    /// Registered team count and total station count.
    #[must_use]
    pub fn capacity(&self) -> (usize, usize) {
        (self.teams.len(), self.station_count())
    }

    // ── Arrival ──

    /// Accepts the arriving team at `station`.
    ///
    /// A station whose previous occupant is still departing cannot accept a
    /// new team until that handoff has been resolved.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation`, `DomainError::NothingToAccept`
    /// if no team is on its way, `DomainError::AlreadyWorking`, or
    /// `DomainError::HandoffPending`.
    pub fn accept_arrival(&mut self, station_id: &StationId) -> Result<Acceptance, DomainError> {
        let station = self.station_mut(station_id)?;
        let team = station
            .current_team()
            .ok_or_else(|| DomainError::NothingToAccept(station_id.to_string()))?
            .to_owned();
        if station.occupancy() == Occupancy::Working {
            return Err(DomainError::AlreadyWorking(station_id.to_string()));
        }
        if let Some(departing) = station.departing_team() {
            return Err(DomainError::HandoffPending {
                station: station_id.to_string(),
                team: departing.to_owned(),
            });
        }

        station.accept();
        Ok(Acceptance {
            team,
            station: station_id.clone(),
        })
    }

    // ── Invariants ──

    /// Checks the registry invariants:
    ///
    /// - an empty station has no current team (structural, checked anyway);
    /// - every referenced team exists;
    /// - a team is in at most one current slot and at most one departing slot;
    /// - to-visit and visited are disjoint for every team;
    /// - there are no more teams than stations.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn verify_invariants(&self) -> Result<(), String> {
        let mut current: HashMap<&str, &StationId> = HashMap::new();
        let mut departing: HashMap<&str, &StationId> = HashMap::new();

        for station in self.stations() {
            if station.occupancy() == Occupancy::Empty && station.current_team().is_some() {
                return Err(format!("empty station {} has a current team", station.id()));
            }
            if let Some(team) = station.current_team() {
                if !self.team_index.contains_key(team) {
                    return Err(format!("station {} references unknown team {team}", station.id()));
                }
                if let Some(other) = current.insert(team, station.id()) {
                    return Err(format!(
                        "team {team} is current at both {other} and {}",
                        station.id()
                    ));
                }
            }
            if let Some(team) = station.departing_team() {
                if !self.team_index.contains_key(team) {
                    return Err(format!("station {} references unknown team {team}", station.id()));
                }
                if let Some(other) = departing.insert(team, station.id()) {
                    return Err(format!(
                        "team {team} is departing from both {other} and {}",
                        station.id()
                    ));
                }
            }
        }

        for team in &self.teams {
            if let Some(location) = team.to_visit().iter().find(|l| team.visited().contains(l)) {
                return Err(format!(
                    "team {} has {location} both to visit and visited",
                    team.name()
                ));
            }
        }

        if self.teams.len() > self.station_count() {
            return Err(format!(
                "{} teams registered for {} stations",
                self.teams.len(),
                self.station_count()
            ));
        }

        Ok(())
    }
}
