//! Single-writer worker that owns the authoritative [`Registry`].
//!
//! Receives commands from [`RegistryHandle`](super::handle::RegistryHandle)
//! one at a time, so every operation runs as if under one global lock.
//! After each successful mutation the snapshot is saved before the next
//! command is taken.

use std::sync::Arc;

use questline_core::error::DomainError;
use questline_core::event::Clock;
use questline_core::identity::Identity;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use super::command_handlers::{self, Handled, Release};
use super::persistence::SnapshotPersistence;
use crate::domain::commands::{
    AcceptArrival, BeginHandoff, EditToVisit, ForceAssign, ForceStatus, RegisterTeam, ResetAll,
    ResetStation, ResolveHandoff,
};
use crate::domain::outcomes::{
    Acceptance, Assignment, Departure, ForcedAssignment, Routing, StatusChange, ToVisitEdit,
    TouchedStation,
};
use crate::domain::registry::Registry;
use crate::domain::roles::Role;

type Reply<T> = oneshot::Sender<Result<Handled<T>, DomainError>>;

/// Commands that can be sent to the registry worker.
pub(crate) enum Command {
    RegisterTeam {
        command: RegisterTeam,
        reply: Reply<Assignment>,
    },
    AcceptArrival {
        command: AcceptArrival,
        reply: Reply<Acceptance>,
    },
    BeginHandoff {
        command: BeginHandoff,
        reply: Reply<Departure>,
    },
    ResolveHandoff {
        command: ResolveHandoff,
        reply: Reply<Routing>,
    },
    Release {
        command: BeginHandoff,
        reply: Reply<Release>,
    },
    ForceStatus {
        command: ForceStatus,
        reply: Reply<StatusChange>,
    },
    ForceAssign {
        command: ForceAssign,
        reply: Reply<ForcedAssignment>,
    },
    ResetStation {
        command: ResetStation,
        reply: Reply<TouchedStation>,
    },
    ResetAll {
        command: ResetAll,
        reply: Reply<Vec<TouchedStation>>,
    },
    EditToVisit {
        command: EditToVisit,
        reply: Reply<ToVisitEdit>,
    },
    /// Read-only copy of the current state.
    Query { reply: oneshot::Sender<Registry> },
    RoleOf {
        identity: Identity,
        reply: oneshot::Sender<Role>,
    },
}

/// Background task that serializes all registry access.
pub(crate) struct RegistryWorker {
    registry: Registry,
    clock: Arc<dyn Clock>,
    persistence: Option<SnapshotPersistence>,
    command_rx: mpsc::Receiver<Command>,
}

impl RegistryWorker {
    pub(crate) fn new(
        registry: Registry,
        clock: Arc<dyn Clock>,
        persistence: Option<SnapshotPersistence>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        info!(
            stations = registry.station_count(),
            teams = registry.teams().len(),
            persistent = persistence.is_some(),
            "registry worker initialized"
        );
        Self {
            registry,
            clock,
            persistence,
            command_rx,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub(crate) async fn run(mut self) {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        debug!("registry worker stopped: all handles dropped");
    }

    async fn handle_command(&mut self, command: Command) {
        let clock = Arc::clone(&self.clock);
        let clock = clock.as_ref();
        match command {
            Command::RegisterTeam { command, reply } => {
                let result =
                    command_handlers::handle_register_team(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::AcceptArrival { command, reply } => {
                let result =
                    command_handlers::handle_accept_arrival(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::BeginHandoff { command, reply } => {
                let result =
                    command_handlers::handle_begin_handoff(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::ResolveHandoff { command, reply } => {
                let result =
                    command_handlers::handle_resolve_handoff(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::Release { command, reply } => {
                let result = command_handlers::handle_release(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::ForceStatus { command, reply } => {
                let result =
                    command_handlers::handle_force_status(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::ForceAssign { command, reply } => {
                let result =
                    command_handlers::handle_force_assign(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::ResetStation { command, reply } => {
                let result =
                    command_handlers::handle_reset_station(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::ResetAll { command, reply } => {
                let handled = command_handlers::handle_reset_all(&command, &mut self.registry, clock);
                self.commit(Ok(handled), reply).await;
            }
            Command::EditToVisit { command, reply } => {
                let result =
                    command_handlers::handle_edit_to_visit(&command, &mut self.registry, clock);
                self.commit(result, reply).await;
            }
            Command::Query { reply } => {
                if reply.send(self.registry.clone()).is_err() {
                    debug!("query reply channel closed (caller dropped)");
                }
            }
            Command::RoleOf { identity, reply } => {
                if reply.send(self.registry.role_of(&identity)).is_err() {
                    debug!("role reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Saves after a successful command and replies to the caller.
    async fn commit<T>(&self, result: Result<Handled<T>, DomainError>, reply: Reply<T>) {
        let result = match result {
            Ok(mut handled) => {
                handled.persisted = self.save().await;
                Ok(handled)
            }
            Err(err) => Err(err),
        };
        if reply.send(result).is_err() {
            debug!("command reply channel closed (caller dropped)");
        }
    }

    /// Returns whether the snapshot is now stored. Without persistence
    /// configured there is nothing to save.
    async fn save(&self) -> bool {
        let Some(persistence) = &self.persistence else {
            return false;
        };
        match persistence.save(&self.registry).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    key = persistence.key(),
                    code = err.code(),
                    error = %err,
                    "snapshot save failed; stored state is stale"
                );
                false
            }
        }
    }
}
