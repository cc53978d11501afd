//! Commands for the registry.

use questline_core::command::Command;
use uuid::Uuid;

use super::ids::StationId;
use super::outcomes::EditAction;
use super::station::Occupancy;

/// Command to register a team and send it to its first station.
#[derive(Debug, Clone)]
pub struct RegisterTeam {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The team name (trimmed on registration).
    pub name: String,
}

impl Command for RegisterTeam {
    fn command_type(&self) -> &'static str {
        "registry.register_team"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to accept the team arriving at a station.
#[derive(Debug, Clone)]
pub struct AcceptArrival {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The caretaker's station.
    pub station: StationId,
}

impl Command for AcceptArrival {
    fn command_type(&self) -> &'static str {
        "registry.accept_arrival"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start handing off the team working a station.
#[derive(Debug, Clone)]
pub struct BeginHandoff {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The station being vacated.
    pub station: StationId,
}

impl Command for BeginHandoff {
    fn command_type(&self) -> &'static str {
        "registry.begin_handoff"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to route the team departing from a station.
#[derive(Debug, Clone)]
pub struct ResolveHandoff {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The station the team is leaving.
    pub station: StationId,
}

impl Command for ResolveHandoff {
    fn command_type(&self) -> &'static str {
        "registry.resolve_handoff"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Admin command to set a station's occupancy.
#[derive(Debug, Clone)]
pub struct ForceStatus {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The station.
    pub station: StationId,
    /// The occupancy to set.
    pub occupancy: Occupancy,
}

impl Command for ForceStatus {
    fn command_type(&self) -> &'static str {
        "registry.force_status"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Admin command to place a team on a station.
#[derive(Debug, Clone)]
pub struct ForceAssign {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The team.
    pub team: String,
    /// The target station.
    pub station: StationId,
}

impl Command for ForceAssign {
    fn command_type(&self) -> &'static str {
        "registry.force_assign"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Admin command to clear one station.
#[derive(Debug, Clone)]
pub struct ResetStation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The station.
    pub station: StationId,
}

impl Command for ResetStation {
    fn command_type(&self) -> &'static str {
        "registry.reset_station"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Admin command to clear every station.
#[derive(Debug, Clone)]
pub struct ResetAll {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResetAll {
    fn command_type(&self) -> &'static str {
        "registry.reset_all"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Admin command to edit a team's to-visit list.
#[derive(Debug, Clone)]
pub struct EditToVisit {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The team.
    pub team: String,
    /// The location.
    pub location: String,
    /// Add or remove.
    pub action: EditAction,
}

impl Command for EditToVisit {
    fn command_type(&self) -> &'static str {
        "registry.edit_to_visit"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
