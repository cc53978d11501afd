//! Audit events emitted by successful registry commands.

use questline_core::event::{Clock, DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::StationId;
use super::outcomes::EditAction;
use super::station::Occupancy;

/// Event type constant for [`TeamRegistered`].
pub const TEAM_REGISTERED_EVENT_TYPE: &str = "registry.team_registered";
/// Event type constant for [`ArrivalAccepted`].
pub const ARRIVAL_ACCEPTED_EVENT_TYPE: &str = "registry.arrival_accepted";
/// Event type constant for [`HandoffBegan`].
pub const HANDOFF_BEGAN_EVENT_TYPE: &str = "registry.handoff_began";
/// Event type constant for [`QuestCompleted`].
pub const QUEST_COMPLETED_EVENT_TYPE: &str = "registry.quest_completed";
/// Event type constant for [`TeamRouted`].
pub const TEAM_ROUTED_EVENT_TYPE: &str = "registry.team_routed";
/// Event type constant for [`StatusForced`].
pub const STATUS_FORCED_EVENT_TYPE: &str = "registry.status_forced";
/// Event type constant for [`TeamForceAssigned`].
pub const TEAM_FORCE_ASSIGNED_EVENT_TYPE: &str = "registry.team_force_assigned";
/// Event type constant for [`StationReset`].
pub const STATION_RESET_EVENT_TYPE: &str = "registry.station_reset";
/// Event type constant for [`ToVisitEdited`].
pub const TO_VISIT_EDITED_EVENT_TYPE: &str = "registry.to_visit_edited";

/// Emitted when a team is registered and sent to its first station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRegistered {
    /// The new team.
    pub team: String,
    /// Its first station.
    pub station: StationId,
}

/// Emitted when a caretaker accepts an arriving team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalAccepted {
    /// The team now working.
    pub team: String,
    /// The station.
    pub station: StationId,
}

/// Emitted when a team leaves its station and awaits routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffBegan {
    /// The departing team.
    pub team: String,
    /// The station it left.
    pub station: StationId,
}

/// Emitted when a team leaves its last station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCompleted {
    /// The finished team.
    pub team: String,
    /// The last station it worked.
    pub station: StationId,
}

/// Emitted when a departing team is routed to its next station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRouted {
    /// The routed team.
    pub team: String,
    /// The station it left.
    pub from: StationId,
    /// The station it was sent to.
    pub to: StationId,
    /// The location marked visited.
    pub visited_location: String,
}

/// Emitted when an admin forces a station's occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusForced {
    /// The station.
    pub station: StationId,
    /// Occupancy before.
    pub previous: Occupancy,
    /// Occupancy after.
    pub occupancy: Occupancy,
    /// Team that lost the station, if any.
    pub displaced: Option<String>,
}

/// Emitted when an admin places a team on a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamForceAssigned {
    /// The team placed.
    pub team: String,
    /// The station it was placed on.
    pub station: StationId,
    /// Team that lost the station, if any.
    pub displaced: Option<String>,
    /// Stations the team was removed from.
    pub removed_from: Vec<StationId>,
}

/// Emitted when an admin clears a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationReset {
    /// The station.
    pub station: StationId,
    /// Former current team.
    pub current: Option<String>,
    /// Former departing team.
    pub departing: Option<String>,
}

/// Emitted when an admin edits a team's to-visit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToVisitEdited {
    /// The team.
    pub team: String,
    /// The location added or removed.
    pub location: String,
    /// Add or remove.
    pub action: EditAction,
}

/// Event payload variants for the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEventKind {
    /// A team was registered.
    TeamRegistered(TeamRegistered),
    /// A team's arrival was accepted.
    ArrivalAccepted(ArrivalAccepted),
    /// A handoff began.
    HandoffBegan(HandoffBegan),
    /// A team finished its quest.
    QuestCompleted(QuestCompleted),
    /// A team was routed.
    TeamRouted(TeamRouted),
    /// A station's occupancy was forced.
    StatusForced(StatusForced),
    /// A team was force-assigned.
    TeamForceAssigned(TeamForceAssigned),
    /// A station was reset.
    StationReset(StationReset),
    /// A to-visit list was edited.
    ToVisitEdited(ToVisitEdited),
}

impl RegistryEventKind {
    /// The event type constant for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TeamRegistered(_) => TEAM_REGISTERED_EVENT_TYPE,
            Self::ArrivalAccepted(_) => ARRIVAL_ACCEPTED_EVENT_TYPE,
            Self::HandoffBegan(_) => HANDOFF_BEGAN_EVENT_TYPE,
            Self::QuestCompleted(_) => QUEST_COMPLETED_EVENT_TYPE,
            Self::TeamRouted(_) => TEAM_ROUTED_EVENT_TYPE,
            Self::StatusForced(_) => STATUS_FORCED_EVENT_TYPE,
            Self::TeamForceAssigned(_) => TEAM_FORCE_ASSIGNED_EVENT_TYPE,
            Self::StationReset(_) => STATION_RESET_EVENT_TYPE,
            Self::ToVisitEdited(_) => TO_VISIT_EDITED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the registry.
#[derive(Debug, Clone)]
pub struct RegistryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: RegistryEventKind,
}

impl RegistryEvent {
    /// Wraps `kind` with fresh metadata stamped by `clock`.
    #[must_use]
    pub fn new(kind: RegistryEventKind, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        Self {
            metadata: EventMetadata::new(kind.event_type(), correlation_id, clock),
            kind,
        }
    }
}

impl DomainEvent for RegistryEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or_default()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
