//! Command handlers for the registry.
//!
//! Each handler applies one command to the registry, then turns the outcome
//! into audit events and caretaker notifications. Handlers never persist;
//! the worker saves after a handler succeeds.

use questline_core::command::Command;
use questline_core::error::DomainError;
use questline_core::event::{Clock, DomainEvent};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::{
    AcceptArrival, BeginHandoff, EditToVisit, ForceAssign, ForceStatus, RegisterTeam, ResetAll,
    ResetStation, ResolveHandoff,
};
use crate::domain::events::{
    ArrivalAccepted, HandoffBegan, QuestCompleted, RegistryEvent, RegistryEventKind,
    StationReset, StatusForced, TeamForceAssigned, TeamRegistered, TeamRouted, ToVisitEdited,
};
use crate::domain::ids::StationId;
use crate::domain::notifications::Notification;
use crate::domain::outcomes::{
    Acceptance, Assignment, Departure, ForcedAssignment, Routing, SlotChange, StatusChange,
    ToVisitEdit, TouchedStation,
};
use crate::domain::registry::Registry;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct Handled<T> {
    /// The operation-specific outcome.
    pub value: T,
    /// Audit events produced.
    pub events: Vec<RegistryEvent>,
    /// Messages for caretakers of the stations involved.
    pub notifications: Vec<Notification>,
    /// Whether the snapshot was saved after the command.
    pub persisted: bool,
}

impl<T> Handled<T> {
    fn new(value: T, events: Vec<RegistryEvent>, notifications: Vec<Notification>) -> Self {
        Self {
            value,
            events,
            notifications,
            persisted: false,
        }
    }

    /// Ids of the events produced, in order.
    #[must_use]
    pub fn event_ids(&self) -> Vec<Uuid> {
        self.events.iter().map(|e| e.metadata().event_id).collect()
    }
}

/// Outcome of a caretaker releasing a team: the handoff is begun and, unless
/// the quest is complete, routing is attempted right away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Release {
    /// The team had nothing left to visit.
    QuestComplete {
        /// The finished team.
        team: String,
        /// The station it left.
        station: StationId,
    },
    /// The team was routed to its next station.
    Routed(Routing),
    /// No station was free; the handoff stays pending at `station`.
    Blocked {
        /// The departing team.
        team: String,
        /// The station it is leaving.
        station: StationId,
    },
}

fn rejected(command: &dyn Command, err: &DomainError) {
    warn!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        code = err.code(),
        error = %err,
        "command rejected"
    );
}

fn accepted(command: &dyn Command, events: &[RegistryEvent]) {
    for event in events {
        info!(
            command_type = command.command_type(),
            correlation_id = %command.correlation_id(),
            event_id = %event.metadata().event_id,
            event_type = event.event_type(),
            payload = %event.to_payload(),
            "registry event"
        );
    }
}

fn finish<T>(
    command: &dyn Command,
    value: T,
    events: Vec<RegistryEvent>,
    notifications: Vec<Notification>,
) -> Handled<T> {
    accepted(command, &events);
    Handled::new(value, events, notifications)
}

/// Handles the `RegisterTeam` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTeamName`, `DomainError::DuplicateTeam`,
/// `DomainError::CapacityExceeded` or `DomainError::NoCapacity`.
pub fn handle_register_team(
    command: &RegisterTeam,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<Assignment>, DomainError> {
    let assignment = registry
        .register_team(&command.name)
        .inspect_err(|e| rejected(command, e))?;

    let event = RegistryEvent::new(
        RegistryEventKind::TeamRegistered(TeamRegistered {
            team: assignment.team.clone(),
            station: assignment.station.clone(),
        }),
        command.correlation_id,
        clock,
    );
    let notifications = Notification::for_assignment(&assignment);
    Ok(finish(command, assignment, vec![event], notifications))
}

/// Handles the `AcceptArrival` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation`, `DomainError::NothingToAccept`,
/// `DomainError::AlreadyWorking` or `DomainError::HandoffPending`.
pub fn handle_accept_arrival(
    command: &AcceptArrival,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<Acceptance>, DomainError> {
    let acceptance = registry
        .accept_arrival(&command.station)
        .inspect_err(|e| rejected(command, e))?;

    let event = RegistryEvent::new(
        RegistryEventKind::ArrivalAccepted(ArrivalAccepted {
            team: acceptance.team.clone(),
            station: acceptance.station.clone(),
        }),
        command.correlation_id,
        clock,
    );
    Ok(finish(command, acceptance, vec![event], Vec::new()))
}

fn departure_event(departure: &Departure, correlation_id: Uuid, clock: &dyn Clock) -> RegistryEvent {
    let kind = match departure {
        Departure::Pending { team, station } => RegistryEventKind::HandoffBegan(HandoffBegan {
            team: team.clone(),
            station: station.clone(),
        }),
        Departure::QuestComplete { team, station } => {
            RegistryEventKind::QuestCompleted(QuestCompleted {
                team: team.clone(),
                station: station.clone(),
            })
        }
    };
    RegistryEvent::new(kind, correlation_id, clock)
}

fn routing_event(routing: &Routing, correlation_id: Uuid, clock: &dyn Clock) -> RegistryEvent {
    RegistryEvent::new(
        RegistryEventKind::TeamRouted(TeamRouted {
            team: routing.assignment.team.clone(),
            from: routing.from.clone(),
            to: routing.assignment.station.clone(),
            visited_location: routing.visited_location.clone(),
        }),
        correlation_id,
        clock,
    )
}

/// Handles the `BeginHandoff` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation`, `DomainError::HandoffPending` or
/// `DomainError::NotWorking`.
pub fn handle_begin_handoff(
    command: &BeginHandoff,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<Departure>, DomainError> {
    let departure = registry
        .begin_handoff(&command.station)
        .inspect_err(|e| rejected(command, e))?;

    let event = departure_event(&departure, command.correlation_id, clock);
    Ok(finish(command, departure, vec![event], Vec::new()))
}

/// Handles the `ResolveHandoff` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation`, `DomainError::NoHandoffPending` or
/// `DomainError::Blocked`.
pub fn handle_resolve_handoff(
    command: &ResolveHandoff,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<Routing>, DomainError> {
    let routing = registry
        .resolve_handoff(&command.station)
        .inspect_err(|e| rejected(command, e))?;

    let event = routing_event(&routing, command.correlation_id, clock);
    let notifications = Notification::for_assignment(&routing.assignment);
    Ok(finish(command, routing, vec![event], notifications))
}

/// Begins a handoff and immediately tries to route the team.
///
/// A blocked route is not an error here: the handoff has begun and stays
/// pending, which the caller reports as `Release::Blocked`.
///
/// # Errors
///
/// Returns the errors of [`handle_begin_handoff`], or of
/// [`handle_resolve_handoff`] other than `DomainError::Blocked`.
pub fn handle_release(
    command: &BeginHandoff,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<Release>, DomainError> {
    let begun = handle_begin_handoff(command, registry, clock)?;
    let (team, station) = match begun.value {
        Departure::QuestComplete { team, station } => {
            return Ok(Handled::new(
                Release::QuestComplete { team, station },
                begun.events,
                begun.notifications,
            ));
        }
        Departure::Pending { team, station } => (team, station),
    };

    let resolve = ResolveHandoff {
        correlation_id: command.correlation_id,
        station: station.clone(),
    };
    let mut events = begun.events;
    match handle_resolve_handoff(&resolve, registry, clock) {
        Ok(routed) => {
            events.extend(routed.events);
            Ok(Handled::new(
                Release::Routed(routed.value),
                events,
                routed.notifications,
            ))
        }
        Err(err) if err.is_blocked() => Ok(Handled::new(
            Release::Blocked { team, station },
            events,
            Vec::new(),
        )),
        Err(err) => Err(err),
    }
}

/// Handles the `ForceStatus` admin command.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation`.
pub fn handle_force_status(
    command: &ForceStatus,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<StatusChange>, DomainError> {
    let change = registry
        .force_status(&command.station, command.occupancy)
        .inspect_err(|e| rejected(command, e))?;

    let event = RegistryEvent::new(
        RegistryEventKind::StatusForced(StatusForced {
            station: change.station.clone(),
            previous: change.previous,
            occupancy: change.occupancy,
            displaced: change.displaced.clone(),
        }),
        command.correlation_id,
        clock,
    );
    let notifications = Notification::for_status_change(&change);
    Ok(finish(command, change, vec![event], notifications))
}

/// Handles the `ForceAssign` admin command.
///
/// # Errors
///
/// Returns `DomainError::UnknownTeam` or `DomainError::UnknownStation`.
pub fn handle_force_assign(
    command: &ForceAssign,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<ForcedAssignment>, DomainError> {
    let forced = registry
        .force_assign(&command.team, &command.station)
        .inspect_err(|e| rejected(command, e))?;

    let removed_from = forced
        .touched
        .iter()
        .filter(|t| matches!(t.change, SlotChange::Lost { .. }))
        .map(|t| t.station.clone())
        .collect();
    let event = RegistryEvent::new(
        RegistryEventKind::TeamForceAssigned(TeamForceAssigned {
            team: forced.team.clone(),
            station: forced.station.clone(),
            displaced: forced.displaced.clone(),
            removed_from,
        }),
        command.correlation_id,
        clock,
    );
    let notifications = forced
        .touched
        .iter()
        .flat_map(Notification::for_touched)
        .collect();
    Ok(finish(command, forced, vec![event], notifications))
}

fn reset_event(touched: &TouchedStation, correlation_id: Uuid, clock: &dyn Clock) -> RegistryEvent {
    let (current, departing) = match &touched.change {
        SlotChange::Reset { current, departing } => (current.clone(), departing.clone()),
        SlotChange::Gained { .. } | SlotChange::Lost { .. } => (None, None),
    };
    RegistryEvent::new(
        RegistryEventKind::StationReset(StationReset {
            station: touched.station.clone(),
            current,
            departing,
        }),
        correlation_id,
        clock,
    )
}

/// Handles the `ResetStation` admin command.
///
/// # Errors
///
/// Returns `DomainError::UnknownStation`.
pub fn handle_reset_station(
    command: &ResetStation,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<TouchedStation>, DomainError> {
    let touched = registry
        .reset_station(&command.station)
        .inspect_err(|e| rejected(command, e))?;

    let event = reset_event(&touched, command.correlation_id, clock);
    let notifications = Notification::for_touched(&touched);
    Ok(finish(command, touched, vec![event], notifications))
}

/// Handles the `ResetAll` admin command. One event per station that was not
/// already idle.
#[must_use]
pub fn handle_reset_all(
    command: &ResetAll,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Handled<Vec<TouchedStation>> {
    let touched = registry.reset_all();

    let events = touched
        .iter()
        .map(|t| reset_event(t, command.correlation_id, clock))
        .collect();
    let notifications = touched.iter().flat_map(Notification::for_touched).collect();
    finish(command, touched, events, notifications)
}

/// Handles the `EditToVisit` admin command. A no-op edit produces no event.
///
/// # Errors
///
/// Returns `DomainError::UnknownTeam` or `DomainError::UnknownLocation`.
pub fn handle_edit_to_visit(
    command: &EditToVisit,
    registry: &mut Registry,
    clock: &dyn Clock,
) -> Result<Handled<ToVisitEdit>, DomainError> {
    let edit = registry
        .edit_to_visit(&command.team, &command.location, command.action)
        .inspect_err(|e| rejected(command, e))?;

    let events = if edit.changed {
        vec![RegistryEvent::new(
            RegistryEventKind::ToVisitEdited(ToVisitEdited {
                team: edit.team.clone(),
                location: edit.location.clone(),
                action: edit.action,
            }),
            command.correlation_id,
            clock,
        )]
    } else {
        Vec::new()
    };
    Ok(finish(command, edit, events, Vec::new()))
}
