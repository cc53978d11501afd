//! Two-phase handoff: a working team leaves its station (begin), then is
//! routed to the first free station in a location it still has to visit
//! (resolve).

use questline_core::error::DomainError;

use super::ids::StationId;
use super::outcomes::{Assignment, Departure, Routing};
use super::registry::Registry;
use super::station::{Occupancy, Station};
use super::team::Team;

impl Registry {
    /// Moves the working team at `station_id` into the departing slot and
    /// frees the station for the next arrival.
    ///
    /// When the team has nothing left to visit besides the location it is
    /// leaving, that location is marked visited, the departing slot is
    /// cleared again and `Departure::QuestComplete` is returned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation`, `DomainError::HandoffPending`
    /// if a previous handoff at this station is unresolved, or
    /// `DomainError::NotWorking` unless a team is working the station.
    pub fn begin_handoff(&mut self, station_id: &StationId) -> Result<Departure, DomainError> {
        let station = self.station(station_id)?;
        if let Some(departing) = station.departing_team() {
            return Err(DomainError::HandoffPending {
                station: station_id.to_string(),
                team: departing.to_owned(),
            });
        }
        let team_name = match (station.occupancy(), station.current_team()) {
            (Occupancy::Working, Some(team)) => team.to_owned(),
            _ => return Err(DomainError::NotWorking(station_id.to_string())),
        };
        let leaving = station_id.location().to_owned();
        let complete = !self.team(&team_name)?.has_remaining_besides(&leaving);

        let station = self.station_mut(station_id)?;
        station.begin_departure();
        if !complete {
            return Ok(Departure::Pending {
                team: team_name,
                station: station_id.clone(),
            });
        }

        station.clear_departing();
        self.team_mut(&team_name)?.mark_visited(&leaving);
        Ok(Departure::QuestComplete {
            team: team_name,
            station: station_id.clone(),
        })
    }

    /// Routes the team departing from `station_id` to its next station.
    ///
    /// On success the location being left is marked visited, the team is
    /// assigned to the target as an arriving team and the departing slot is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation`, `DomainError::NoHandoffPending`
    /// if nobody is departing, or `DomainError::Blocked` when no station is
    /// free. A blocked call changes nothing and may be retried.
    pub fn resolve_handoff(&mut self, station_id: &StationId) -> Result<Routing, DomainError> {
        let team_name = self
            .station(station_id)?
            .departing_team()
            .ok_or_else(|| DomainError::NoHandoffPending(station_id.to_string()))?
            .to_owned();
        let leaving = station_id.location().to_owned();

        let target = self
            .find_next_free_station(self.team(&team_name)?, &leaving)
            .cloned()
            .ok_or_else(|| DomainError::Blocked {
                team: team_name.clone(),
                station: station_id.to_string(),
            })?;

        self.team_mut(&team_name)?.mark_visited(&leaving);
        self.station_mut(&target)?.assign(team_name.clone());
        self.station_mut(station_id)?.clear_departing();

        Ok(Routing {
            from: station_id.clone(),
            visited_location: leaving,
            assignment: Assignment {
                team: team_name,
                caretakers: self.caretaker_pair(&target),
                station: target,
            },
        })
    }

    /// First empty station, in configuration order, of a location `team`
    /// still has to visit. The location named `leaving` is skipped.
    #[must_use]
    pub fn find_next_free_station(&self, team: &Team, leaving: &str) -> Option<&StationId> {
        self.locations()
            .iter()
            .filter(|location| location.name() != leaving && team.needs(location.name()))
            .find_map(|location| location.first_empty_station())
            .map(Station::id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use questline_core::identity::Identity;

    use super::*;
    use crate::domain::config::{GameConfig, LocationConfig};
    use crate::domain::outcomes::EditAction;

    fn registry(locations: &[(&str, u32)]) -> Registry {
        let config = GameConfig {
            locations: locations
                .iter()
                .map(|(name, stations)| LocationConfig {
                    name: (*name).to_owned(),
                    stations: *stations,
                })
                .collect(),
            caretakers: locations
                .iter()
                .any(|(name, _)| *name == "B")
                .then(|| (Identity::new("care-b1"), StationId::new("B", 1)))
                .into_iter()
                .collect(),
            admins: BTreeSet::new(),
        };
        Registry::from_config(&config).unwrap()
    }

    fn working(registry: &mut Registry, team: &str) -> StationId {
        let station = registry.register_team(team).unwrap().station;
        registry.accept_arrival(&station).unwrap();
        station
    }

    #[test]
    fn test_full_handoff_routes_team_to_next_location() {
        // Arrange
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");

        // Act
        let departure = registry.begin_handoff(&a1).unwrap();

        // Assert
        assert_eq!(
            departure,
            Departure::Pending {
                team: "T1".into(),
                station: a1.clone()
            }
        );
        let station = registry.station(&a1).unwrap();
        assert_eq!(station.occupancy(), Occupancy::Empty);
        assert_eq!(station.departing_team(), Some("T1"));

        // Act
        let routing = registry.resolve_handoff(&a1).unwrap();

        // Assert
        assert_eq!(routing.assignment.station, StationId::new("B", 1));
        assert_eq!(routing.visited_location, "A");
        assert_eq!(
            routing.assignment.caretakers.iter().next(),
            Some(&Identity::new("care-b1"))
        );
        assert!(registry.station(&a1).unwrap().departing_team().is_none());
        let b1 = registry.station(&StationId::new("B", 1)).unwrap();
        assert_eq!(b1.occupancy(), Occupancy::Arriving);
        assert_eq!(b1.current_team(), Some("T1"));
        assert_eq!(registry.team("T1").unwrap().visited(), ["A"]);
    }

    #[test]
    fn test_begin_handoff_twice_reports_pending_handoff() {
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");
        registry.begin_handoff(&a1).unwrap();

        let result = registry.begin_handoff(&a1);

        assert_eq!(
            result,
            Err(DomainError::HandoffPending {
                station: "A-1".into(),
                team: "T1".into()
            })
        );
    }

    #[test]
    fn test_begin_handoff_on_arriving_station_is_not_working() {
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = registry.register_team("T1").unwrap().station;

        assert_eq!(
            registry.begin_handoff(&a1),
            Err(DomainError::NotWorking("A-1".into()))
        );
    }

    #[test]
    fn test_begin_handoff_on_held_station_is_not_working() {
        let mut registry = registry(&[("A", 1)]);
        let a1 = StationId::new("A", 1);
        registry
            .station_mut(&a1)
            .unwrap()
            .force_occupancy(Occupancy::Working);

        assert_eq!(
            registry.begin_handoff(&a1),
            Err(DomainError::NotWorking("A-1".into()))
        );
    }

    #[test]
    fn test_held_station_without_caretakers_is_not_working() {
        // Arrange
        let mut registry = registry(&[("A", 1)]);
        let a1 = registry.register_team("T1").unwrap().station;

        // Act
        let result = registry.begin_handoff(&a1);

        // Assert
        assert_eq!(result, Err(DomainError::NotWorking("A-1".into())));
        assert!(registry.caretaker_pair(&a1).is_empty());
    }

    #[test]
    fn test_location_removed_by_admin_is_not_recorded_as_visited() {
        // Arrange
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");
        registry
            .edit_to_visit("T1", "A", EditAction::Remove)
            .unwrap();
        registry.begin_handoff(&a1).unwrap();

        // Act
        let routing = registry.resolve_handoff(&a1).unwrap();

        // Assert
        let team = registry.team("T1").unwrap();
        assert_eq!(routing.assignment.station, StationId::new("B", 1));
        assert!(team.visited().is_empty());
        assert_eq!(team.to_visit(), ["B"]);
    }

    #[test]
    fn test_last_location_completes_quest_without_routing() {
        // Arrange
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");
        registry.begin_handoff(&a1).unwrap();
        let b1 = registry.resolve_handoff(&a1).unwrap().assignment.station;
        registry.accept_arrival(&b1).unwrap();

        // Act
        let departure = registry.begin_handoff(&b1).unwrap();

        // Assert
        assert!(departure.is_quest_complete());
        let team = registry.team("T1").unwrap();
        assert!(team.is_complete());
        assert_eq!(team.visited(), ["A", "B"]);
        assert!(registry.current_station_of("T1").is_none());
        assert!(registry.departing_station_of("T1").is_none());
        assert_eq!(
            registry.resolve_handoff(&b1),
            Err(DomainError::NoHandoffPending("B-1".into()))
        );
    }

    #[test]
    fn test_blocked_resolve_leaves_state_unchanged_and_retry_succeeds() {
        // Arrange: T1 works A-1, T2 occupies the only B station.
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");
        let b1 = working(&mut registry, "T2");
        registry.begin_handoff(&a1).unwrap();
        let before = registry.clone();

        // Act
        let result = registry.resolve_handoff(&a1);

        // Assert
        assert!(result.unwrap_err().is_blocked());
        assert_eq!(registry, before);
        assert_eq!(registry.station(&a1).unwrap().departing_team(), Some("T1"));

        // Arrange: T2 leaves B-1 and is routed to the now-free A-1.
        registry.begin_handoff(&b1).unwrap();
        let routed = registry.resolve_handoff(&b1).unwrap();
        assert_eq!(routed.assignment.station, a1);

        // Act: B-1 is free again, so the retry goes through.
        let retried = registry.resolve_handoff(&a1).unwrap();

        // Assert
        assert_eq!(retried.assignment.station, b1);
        assert!(registry.station(&a1).unwrap().departing_team().is_none());
        assert!(registry.accept_arrival(&a1).is_ok());
    }

    #[test]
    fn test_accept_is_refused_while_previous_team_is_departing() {
        let mut registry = registry(&[("A", 1), ("B", 1)]);
        let a1 = working(&mut registry, "T1");
        registry.begin_handoff(&a1).unwrap();
        // T2 is sent to the freed A-1 while T1 is still departing.
        registry.register_team("T2").unwrap();

        let result = registry.accept_arrival(&a1);

        assert!(matches!(result, Err(DomainError::HandoffPending { .. })));
    }

    #[test]
    fn test_retry_after_station_frees_up_succeeds() {
        // Arrange
        let mut registry = registry(&[("A", 1), ("B", 1), ("C", 1)]);
        let a1 = working(&mut registry, "T1");
        let b1 = working(&mut registry, "T2");
        let c1 = working(&mut registry, "T3");
        registry.begin_handoff(&a1).unwrap();
        // T1 needs B or C; both busy.
        assert!(registry.resolve_handoff(&a1).unwrap_err().is_blocked());

        // Act: T3 leaves C-1 and goes to A-1, freeing C.
        registry.begin_handoff(&c1).unwrap();
        let t3 = registry.resolve_handoff(&c1).unwrap();
        let retried = registry.resolve_handoff(&a1).unwrap();

        // Assert
        assert_eq!(t3.assignment.station, a1);
        assert_eq!(retried.assignment.station, c1);
        assert_ne!(retried.assignment.station, b1);
    }

    #[test]
    fn test_find_next_free_station_skips_visited_and_leaving_locations() {
        let mut registry = registry(&[("A", 1), ("B", 2), ("C", 1)]);
        registry.register_team("T1").unwrap();
        registry
            .team_mut("T1")
            .unwrap()
            .remove_to_visit("B");
        let team = registry.team("T1").unwrap();

        let next = registry.find_next_free_station(team, "A");

        assert_eq!(next, Some(&StationId::new("C", 1)));
    }
}
