//! Stations: single units of routing capacity.

use serde::{Deserialize, Serialize};

use super::ids::StationId;

/// A station's current-arrival state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    /// No team is arriving or working here.
    #[serde(rename = "Free")]
    Empty,
    /// A team has been sent here and is on its way.
    #[serde(rename = "Waiting")]
    Arriving,
    /// The caretaker accepted the team and it is working the station.
    #[serde(rename = "In progress")]
    Working,
}

/// The arrival slot. Occupancy and the current team are both read from this
/// one value, so an empty station can never hold a current team.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArrivalSlot {
    Empty,
    /// `team` is `None` when an admin forced a non-empty status onto a
    /// station without a team ("held" station, skipped by routing).
    Occupied {
        team: Option<String>,
        working: bool,
    },
}

/// A single station. Created once from configuration and never destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: StationId,
    arrival: ArrivalSlot,
    departing: Option<String>,
}

impl Station {
    /// Creates an empty station.
    #[must_use]
    pub fn new(id: StationId) -> Self {
        Self {
            id,
            arrival: ArrivalSlot::Empty,
            departing: None,
        }
    }

    /// Rebuilds a station from persisted parts. Returns `None` when the parts
    /// contradict each other (a current team on an empty station).
    pub(crate) fn restore(
        id: StationId,
        occupancy: Occupancy,
        current: Option<String>,
        departing: Option<String>,
    ) -> Option<Self> {
        let arrival = match (occupancy, current) {
            (Occupancy::Empty, None) => ArrivalSlot::Empty,
            (Occupancy::Empty, Some(_)) => return None,
            (Occupancy::Arriving, team) => ArrivalSlot::Occupied {
                team,
                working: false,
            },
            (Occupancy::Working, team) => ArrivalSlot::Occupied {
                team,
                working: true,
            },
        };

        Some(Self {
            id,
            arrival,
            departing,
        })
    }

    /// The station identifier.
    #[must_use]
    pub fn id(&self) -> &StationId {
        &self.id
    }

    /// Current occupancy, derived from the arrival slot.
    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        match self.arrival {
            ArrivalSlot::Empty => Occupancy::Empty,
            ArrivalSlot::Occupied { working: false, .. } => Occupancy::Arriving,
            ArrivalSlot::Occupied { working: true, .. } => Occupancy::Working,
        }
    }

    /// Team currently arriving at or working this station.
    #[must_use]
    pub fn current_team(&self) -> Option<&str> {
        match &self.arrival {
            ArrivalSlot::Empty => None,
            ArrivalSlot::Occupied { team, .. } => team.as_deref(),
        }
    }

    /// Previous occupant still awaiting routing, if any.
    #[must_use]
    pub fn departing_team(&self) -> Option<&str> {
        self.departing.as_deref()
    }

    /// Whether a new team may be sent here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arrival == ArrivalSlot::Empty
    }

    /// Whether either slot references `team`.
    #[must_use]
    pub fn references(&self, team: &str) -> bool {
        self.current_team() == Some(team) || self.departing_team() == Some(team)
    }

    /// Sends `team` here as an arriving team, returning any displaced occupant.
    pub(crate) fn assign(&mut self, team: String) -> Option<String> {
        let previous = self.vacate();
        self.arrival = ArrivalSlot::Occupied {
            team: Some(team),
            working: false,
        };
        previous
    }

    /// Marks the arriving team as working.
    pub(crate) fn accept(&mut self) {
        if let ArrivalSlot::Occupied { working, .. } = &mut self.arrival {
            *working = true;
        }
    }

    /// Moves the current team into the departing slot and empties the
    /// arrival slot. Returns the departing team.
    pub(crate) fn begin_departure(&mut self) -> Option<String> {
        let team = self.vacate()?;
        self.departing = Some(team.clone());
        Some(team)
    }

    /// Clears the departing slot, returning the team that was in it.
    pub(crate) fn clear_departing(&mut self) -> Option<String> {
        self.departing.take()
    }

    /// Empties the arrival slot, returning the team that was in it.
    pub(crate) fn vacate(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.arrival, ArrivalSlot::Empty) {
            ArrivalSlot::Empty => None,
            ArrivalSlot::Occupied { team, .. } => team,
        }
    }

    /// Unconditionally sets the occupancy. Forcing `Empty` vacates the
    /// arrival slot and returns the team that lost it.
    pub(crate) fn force_occupancy(&mut self, occupancy: Occupancy) -> Option<String> {
        match occupancy {
            Occupancy::Empty => self.vacate(),
            Occupancy::Arriving | Occupancy::Working => {
                let working = occupancy == Occupancy::Working;
                if let ArrivalSlot::Occupied { working: current, .. } = &mut self.arrival {
                    *current = working;
                } else {
                    self.arrival = ArrivalSlot::Occupied {
                        team: None,
                        working,
                    };
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station() -> Station {
        Station::new(StationId::new("A", 1))
    }

    #[test]
    fn test_new_station_is_empty() {
        let station = station();

        assert_eq!(station.occupancy(), Occupancy::Empty);
        assert!(station.current_team().is_none());
        assert!(station.departing_team().is_none());
    }

    #[test]
    fn test_assign_then_accept_moves_through_arriving_to_working() {
        let mut station = station();

        station.assign("Owls".to_owned());
        assert_eq!(station.occupancy(), Occupancy::Arriving);

        station.accept();
        assert_eq!(station.occupancy(), Occupancy::Working);
        assert_eq!(station.current_team(), Some("Owls"));
    }

    #[test]
    fn test_begin_departure_frees_arrival_slot_but_keeps_departing_team() {
        let mut station = station();
        station.assign("Owls".to_owned());
        station.accept();

        let departing = station.begin_departure();

        assert_eq!(departing.as_deref(), Some("Owls"));
        assert!(station.is_empty());
        assert_eq!(station.departing_team(), Some("Owls"));
    }

    #[test]
    fn test_forcing_empty_vacates_current_team() {
        let mut station = station();
        station.assign("Owls".to_owned());

        let displaced = station.force_occupancy(Occupancy::Empty);

        assert_eq!(displaced.as_deref(), Some("Owls"));
        assert!(station.current_team().is_none());
    }

    #[test]
    fn test_forcing_working_on_empty_station_holds_it_without_team() {
        let mut station = station();

        station.force_occupancy(Occupancy::Working);

        assert_eq!(station.occupancy(), Occupancy::Working);
        assert!(station.current_team().is_none());
        assert!(!station.is_empty());
    }

    #[test]
    fn test_restore_rejects_team_on_empty_station() {
        let restored = Station::restore(
            StationId::new("A", 1),
            Occupancy::Empty,
            Some("Owls".to_owned()),
            None,
        );

        assert!(restored.is_none());
    }

    #[test]
    fn test_occupancy_uses_stored_status_names() {
        assert_eq!(serde_json::to_string(&Occupancy::Empty).unwrap(), "\"Free\"");
        assert_eq!(
            serde_json::to_string(&Occupancy::Arriving).unwrap(),
            "\"Waiting\""
        );
        assert_eq!(
            serde_json::to_string(&Occupancy::Working).unwrap(),
            "\"In progress\""
        );
    }
}
