//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every registry operation returns one of these for expected conditions
/// (unknown ids, capacity, blocked routing). None of them are panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No station with this id exists.
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// A station id could not be parsed (expected `<location>-<index>`).
    #[error("invalid station id: {0:?}")]
    InvalidStationId(String),

    /// No team with this name is registered.
    #[error("unknown team: {0}")]
    UnknownTeam(String),

    /// No location with this name exists.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// A team name was empty after trimming.
    #[error("invalid team name: {0:?}")]
    InvalidTeamName(String),

    /// A team with this name is already registered.
    #[error("team already registered: {0}")]
    DuplicateTeam(String),

    /// Registering another team would exceed the total station count.
    #[error("capacity exceeded: {teams} teams already registered for {stations} stations")]
    CapacityExceeded {
        /// Teams currently registered.
        teams: usize,
        /// Total stations across all locations.
        stations: usize,
    },

    /// Capacity allows another team but no station is empty.
    #[error("no empty station available for a new team")]
    NoCapacity,

    /// The station has no arriving team to accept.
    #[error("station {0} has no team to accept")]
    NothingToAccept(String),

    /// The station is already working with its current team.
    #[error("station {0} is already working")]
    AlreadyWorking(String),

    /// The previous occupant of the station is still awaiting routing.
    #[error("station {station} still has departing team {team} awaiting routing")]
    HandoffPending {
        /// The station with the pending handoff.
        station: String,
        /// The team that is departing.
        team: String,
    },

    /// The station is not working with a team.
    #[error("station {0} is not working with a team")]
    NotWorking(String),

    /// The station has no departing team to route.
    #[error("station {0} has no departing team")]
    NoHandoffPending(String),

    /// No empty station exists in any location the team still has to visit.
    /// The handoff stays pending; retry once a station frees up.
    #[error("no free station for team {team} leaving {station}; try again once a station frees up")]
    Blocked {
        /// The team awaiting a route.
        team: String,
        /// The station the team is leaving.
        station: String,
    },

    /// Game configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A stored snapshot could not be read or is malformed.
    #[error("failed to load snapshot: {0}")]
    LoadFailure(String),

    /// A snapshot could not be written.
    #[error("failed to save snapshot: {0}")]
    SaveFailure(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),

    /// The registry worker is no longer accepting commands.
    #[error("registry is unavailable")]
    RegistryUnavailable,
}

impl DomainError {
    /// Returns `true` for the retryable "no free station" outcome.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownStation(_) => "unknown_station",
            Self::InvalidStationId(_) => "invalid_station_id",
            Self::UnknownTeam(_) => "unknown_team",
            Self::UnknownLocation(_) => "unknown_location",
            Self::InvalidTeamName(_) => "invalid_team_name",
            Self::DuplicateTeam(_) => "duplicate_team",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::NoCapacity => "no_capacity",
            Self::NothingToAccept(_) => "nothing_to_accept",
            Self::AlreadyWorking(_) => "already_working",
            Self::HandoffPending { .. } => "handoff_pending",
            Self::NotWorking(_) => "not_working",
            Self::NoHandoffPending(_) => "no_handoff_pending",
            Self::Blocked { .. } => "blocked",
            Self::InvalidConfig(_) => "invalid_config",
            Self::LoadFailure(_) => "load_failure",
            Self::SaveFailure(_) => "save_failure",
            Self::Infrastructure(_) => "infrastructure_error",
            Self::RegistryUnavailable => "registry_unavailable",
        }
    }
}
