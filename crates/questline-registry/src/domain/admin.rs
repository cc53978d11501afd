//! Administrative overrides. These bypass the arrival and handoff rules and
//! report every station they touch so caretakers can be told.

use questline_core::error::DomainError;

use super::ids::StationId;
use super::location::Location;
use super::outcomes::{
    EditAction, ForcedAssignment, SlotChange, StatusChange, ToVisitEdit, TouchedStation,
};
use super::registry::Registry;
use super::station::{Occupancy, Station};
use super::team::Team;

impl Registry {
    /// Sets a station's occupancy unconditionally.
    ///
    /// Forcing `Empty` vacates the arrival slot; the former occupant becomes
    /// unassigned. Forcing `Arriving` or `Working` on a station without a
    /// current team holds it so routing skips it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` if no such station exists.
    pub fn force_status(
        &mut self,
        station_id: &StationId,
        occupancy: Occupancy,
    ) -> Result<StatusChange, DomainError> {
        let station = self.station_mut(station_id)?;
        let previous = station.occupancy();
        let displaced = station.force_occupancy(occupancy);
        Ok(StatusChange {
            station: station_id.clone(),
            previous,
            occupancy,
            displaced,
            caretakers: self.caretaker_pair(station_id),
        })
    }

    /// Places `team` in the arrival slot of `station_id`.
    ///
    /// Every other station where the team is current loses it and becomes
    /// empty; every departing slot naming the team is cleared, the target's
    /// included. A different team already arriving at or working the target
    /// is displaced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTeam` or `DomainError::UnknownStation`.
    pub fn force_assign(
        &mut self,
        team: &str,
        station_id: &StationId,
    ) -> Result<ForcedAssignment, DomainError> {
        self.team(team)?;
        self.station(station_id)?;

        let referencing: Vec<StationId> = self
            .stations()
            .filter(|s| s.references(team))
            .map(|s| s.id().clone())
            .collect();

        let mut touched = Vec::new();
        for id in referencing {
            let station = self.station_mut(&id)?;
            if station.departing_team() == Some(team) {
                station.clear_departing();
            }
            if id != *station_id && station.current_team() == Some(team) {
                station.vacate();
            }
            if id != *station_id {
                touched.push(TouchedStation {
                    caretakers: self.caretaker_pair(&id),
                    station: id,
                    change: SlotChange::Lost {
                        team: team.to_owned(),
                    },
                });
            }
        }

        let displaced = self
            .station_mut(station_id)?
            .assign(team.to_owned())
            .filter(|previous| previous != team);
        touched.push(TouchedStation {
            station: station_id.clone(),
            caretakers: self.caretaker_pair(station_id),
            change: SlotChange::Gained {
                team: team.to_owned(),
            },
        });

        Ok(ForcedAssignment {
            team: team.to_owned(),
            station: station_id.clone(),
            displaced,
            touched,
        })
    }

    /// Clears both slots of a station and forces it empty. The teams involved
    /// keep their to-visit and visited lists and become unassigned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` if no such station exists.
    pub fn reset_station(&mut self, station_id: &StationId) -> Result<TouchedStation, DomainError> {
        let change = clear_slots(self.station_mut(station_id)?);
        Ok(TouchedStation {
            station: station_id.clone(),
            caretakers: self.caretaker_pair(station_id),
            change,
        })
    }

    /// Resets every station. Returns only the stations that were not already
    /// idle.
    pub fn reset_all(&mut self) -> Vec<TouchedStation> {
        let cleared: Vec<(StationId, SlotChange)> = self
            .locations
            .iter_mut()
            .flat_map(Location::stations_mut)
            .filter(|station| !station.is_empty() || station.departing_team().is_some())
            .map(|station| (station.id().clone(), clear_slots(station)))
            .collect();

        cleared
            .into_iter()
            .map(|(station, change)| TouchedStation {
                caretakers: self.caretaker_pair(&station),
                station,
                change,
            })
            .collect()
    }

    /// Adds or removes a location from a team's to-visit list. Adding a
    /// visited location re-opens it. Both directions are no-ops when already
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTeam` or `DomainError::UnknownLocation`.
    pub fn edit_to_visit(
        &mut self,
        team: &str,
        location: &str,
        action: EditAction,
    ) -> Result<ToVisitEdit, DomainError> {
        self.team(team)?;
        if !self.has_location(location) {
            return Err(DomainError::UnknownLocation(location.to_owned()));
        }

        let entry = self.team_mut(team)?;
        let changed = match action {
            EditAction::Add => entry.add_to_visit(location),
            EditAction::Remove => entry.remove_to_visit(location),
        };
        Ok(ToVisitEdit {
            team: team.to_owned(),
            location: location.to_owned(),
            action,
            changed,
            to_visit: entry.to_visit().to_vec(),
        })
    }

    /// Teams that still have locations to visit but sit in no station slot,
    /// in registration order.
    #[must_use]
    pub fn find_unassigned_teams(&self) -> Vec<&Team> {
        self.teams()
            .iter()
            .filter(|team| !team.is_complete())
            .filter(|team| !self.stations().any(|s| s.references(team.name())))
            .collect()
    }
}

fn clear_slots(station: &mut Station) -> SlotChange {
    let current = station.vacate();
    let departing = station.clear_departing();
    SlotChange::Reset { current, departing }
}
