//! Results of successful registry operations.

use serde::{Deserialize, Serialize};

use super::ids::StationId;
use super::roles::CaretakerPair;
use super::station::Occupancy;

/// A team was sent to a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// The team on its way.
    pub team: String,
    /// The station it was sent to.
    pub station: StationId,
    /// Caretakers to notify at that station.
    pub caretakers: CaretakerPair,
}

/// A caretaker accepted an arriving team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    /// The team now working.
    pub team: String,
    /// The station it is working.
    pub station: StationId,
}

/// Result of starting a handoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Departure {
    /// The team left and awaits routing to its next station.
    Pending {
        /// The departing team.
        team: String,
        /// The station it left.
        station: StationId,
    },
    /// The team had nothing left to visit; no routing is attempted.
    QuestComplete {
        /// The finished team.
        team: String,
        /// The last station it worked.
        station: StationId,
    },
}

impl Departure {
    /// The departing team.
    #[must_use]
    pub fn team(&self) -> &str {
        match self {
            Self::Pending { team, .. } | Self::QuestComplete { team, .. } => team,
        }
    }

    /// Whether the handoff finished the team's quest.
    #[must_use]
    pub fn is_quest_complete(&self) -> bool {
        matches!(self, Self::QuestComplete { .. })
    }
}

/// A departing team was routed to its next station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routing {
    /// The station the team left.
    pub from: StationId,
    /// The location marked visited.
    pub visited_location: String,
    /// Where the team goes next.
    pub assignment: Assignment,
}

/// How an administrative override changed a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SlotChange {
    /// The team was placed in the station's arrival slot.
    Gained {
        /// The team placed here.
        team: String,
    },
    /// The team was removed from this station.
    Lost {
        /// The team removed.
        team: String,
    },
    /// The station was cleared.
    Reset {
        /// Former current team.
        current: Option<String>,
        /// Former departing team.
        departing: Option<String>,
    },
}

/// A station touched by an override, with its caretakers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouchedStation {
    /// The station.
    pub station: StationId,
    /// Its caretakers.
    pub caretakers: CaretakerPair,
    /// What happened to it.
    pub change: SlotChange,
}

/// Result of `ForceAssign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedAssignment {
    /// The team reassigned.
    pub team: String,
    /// The station it now occupies.
    pub station: StationId,
    /// Team displaced from the target's arrival slot, if any.
    pub displaced: Option<String>,
    /// Every station that gained or lost a team.
    pub touched: Vec<TouchedStation>,
}

/// Result of `ForceStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// The station.
    pub station: StationId,
    /// Occupancy before the override.
    pub previous: Occupancy,
    /// Occupancy after the override.
    pub occupancy: Occupancy,
    /// Team that lost the arrival slot when the station was forced empty.
    pub displaced: Option<String>,
    /// Caretakers of the station.
    pub caretakers: CaretakerPair,
}

/// Whether an edit adds or removes a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    /// Add to the to-visit set.
    Add,
    /// Remove from the to-visit set.
    Remove,
}

/// Result of `EditToVisit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToVisitEdit {
    /// The team edited.
    pub team: String,
    /// The location added or removed.
    pub location: String,
    /// The requested action.
    pub action: EditAction,
    /// `false` when the edit was a no-op.
    pub changed: bool,
    /// The team's to-visit list after the edit.
    pub to_visit: Vec<String>,
}
