//! Caretaker notifications derived from operation outcomes.
//!
//! The registry never sends anything. Callers deliver these.

use questline_core::identity::Identity;
use serde::Serialize;

use super::ids::StationId;
use super::outcomes::{Assignment, SlotChange, StatusChange, TouchedStation};
use super::roles::CaretakerPair;

/// What a caretaker is being told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    /// A team is on its way to the caretaker's station.
    TeamIncoming {
        /// The arriving team.
        team: String,
    },
    /// An admin took the team away from the caretaker's station.
    TeamRemoved {
        /// The team removed.
        team: String,
    },
    /// An admin sent the team to the caretaker's station.
    TeamReassigned {
        /// The team placed here.
        team: String,
    },
    /// An admin cleared the station.
    StationReset,
}

/// One message for one caretaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Who to tell.
    pub recipient: Identity,
    /// The station the message is about.
    pub station: StationId,
    /// The message.
    #[serde(flatten)]
    pub kind: NotificationKind,
}

impl Notification {
    /// One notification per filled caretaker slot.
    #[must_use]
    pub fn to_caretakers(
        caretakers: &CaretakerPair,
        station: &StationId,
        kind: &NotificationKind,
    ) -> Vec<Self> {
        caretakers
            .iter()
            .map(|recipient| Self {
                recipient: recipient.clone(),
                station: station.clone(),
                kind: kind.clone(),
            })
            .collect()
    }

    /// Tells the target's caretakers that a team is coming.
    #[must_use]
    pub fn for_assignment(assignment: &Assignment) -> Vec<Self> {
        Self::to_caretakers(
            &assignment.caretakers,
            &assignment.station,
            &NotificationKind::TeamIncoming {
                team: assignment.team.clone(),
            },
        )
    }

    /// Tells the caretakers of a station touched by an override.
    #[must_use]
    pub fn for_touched(touched: &TouchedStation) -> Vec<Self> {
        let kind = match &touched.change {
            SlotChange::Gained { team } => NotificationKind::TeamReassigned { team: team.clone() },
            SlotChange::Lost { team } => NotificationKind::TeamRemoved { team: team.clone() },
            SlotChange::Reset { .. } => NotificationKind::StationReset,
        };
        Self::to_caretakers(&touched.caretakers, &touched.station, &kind)
    }

    /// Tells the caretakers when a forced status removed their team.
    #[must_use]
    pub fn for_status_change(change: &StatusChange) -> Vec<Self> {
        change
            .displaced
            .iter()
            .flat_map(|team| {
                Self::to_caretakers(
                    &change.caretakers,
                    &change.station,
                    &NotificationKind::TeamRemoved { team: team.clone() },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::station::Occupancy;

    fn pair() -> CaretakerPair {
        let ids = [Identity::new("10"), Identity::new("11")];
        CaretakerPair::collect(ids.iter())
    }

    #[test]
    fn test_assignment_notifies_both_caretakers() {
        let assignment = Assignment {
            team: "Owls".into(),
            station: StationId::new("B", 1),
            caretakers: pair(),
        };

        let notifications = Notification::for_assignment(&assignment);

        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(|n| n.kind
            == NotificationKind::TeamIncoming {
                team: "Owls".into()
            }));
    }

    #[test]
    fn test_station_without_caretakers_yields_nothing() {
        let touched = TouchedStation {
            station: StationId::new("B", 1),
            caretakers: CaretakerPair::default(),
            change: SlotChange::Lost {
                team: "Owls".into(),
            },
        };

        assert!(Notification::for_touched(&touched).is_empty());
    }

    #[test]
    fn test_status_change_without_displacement_is_silent() {
        let change = StatusChange {
            station: StationId::new("B", 1),
            previous: Occupancy::Arriving,
            occupancy: Occupancy::Working,
            displaced: None,
            caretakers: pair(),
        };

        assert!(Notification::for_status_change(&change).is_empty());
    }

    #[test]
    fn test_notification_serializes_flat() {
        let notification = Notification {
            recipient: Identity::new("10"),
            station: StationId::new("B", 1),
            kind: NotificationKind::StationReset,
        };

        let json = serde_json::to_value(&notification).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"recipient": "10", "station": "B-1", "kind": "station_reset"})
        );
    }
}
