//! Cloneable façade for issuing commands to the registry worker.
//!
//! [`RegistryHandle`] hides channel plumbing and offers one async method per
//! registry operation.

use std::sync::Arc;

use questline_core::error::DomainError;
use questline_core::event::Clock;
use questline_core::identity::Identity;
use tokio::sync::{mpsc, oneshot};

use super::command_handlers::{Handled, Release};
use super::persistence::SnapshotPersistence;
use super::worker::{Command, RegistryWorker};
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

/// Queue depth between handles and the worker.
const COMMAND_BUFFER: usize = 64;

type Reply<T> = oneshot::Receiver<Result<Handled<T>, DomainError>>;

/// Client-facing handle to the registry worker.
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    command_tx: mpsc::Sender<Command>,
}

impl RegistryHandle {
    /// Spawns the worker on the current tokio runtime and returns a handle to
    /// it. With `persistence`, the snapshot is saved after every successful
    /// mutation.
    #[must_use]
    pub fn spawn(
        registry: Registry,
        clock: Arc<dyn Clock>,
        persistence: Option<SnapshotPersistence>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let worker = RegistryWorker::new(registry, clock, persistence, command_rx);
        tokio::spawn(worker.run());
        Self { command_tx }
    }

    async fn send(&self, command: Command) -> Result<(), DomainError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| DomainError::RegistryUnavailable)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<Handled<T>, DomainError>>) -> Command,
    ) -> Result<Handled<T>, DomainError> {
        let (reply_tx, reply_rx): (_, Reply<T>) = oneshot::channel();
        self.send(build(reply_tx)).await?;
        reply_rx
            .await
            .map_err(|_| DomainError::RegistryUnavailable)?
    }

    /// Registers a team and sends it to its first station.
    ///
    /// # Errors
    ///
    /// Returns the registration errors, or `DomainError::RegistryUnavailable`
    /// if the worker has stopped.
    pub async fn register_team(&self, command: RegisterTeam) -> Result<Handled<Assignment>, DomainError> {
        self.request(|reply| Command::RegisterTeam { command, reply })
            .await
    }

    /// Accepts the team arriving at a station.
    ///
    /// # Errors
    ///
    /// Returns the acceptance errors, or `DomainError::RegistryUnavailable`.
    pub async fn accept_arrival(
        &self,
        command: AcceptArrival,
    ) -> Result<Handled<Acceptance>, DomainError> {
        self.request(|reply| Command::AcceptArrival { command, reply })
            .await
    }

    /// Begins a handoff without routing.
    ///
    /// # Errors
    ///
    /// Returns the handoff errors, or `DomainError::RegistryUnavailable`.
    pub async fn begin_handoff(
        &self,
        command: BeginHandoff,
    ) -> Result<Handled<Departure>, DomainError> {
        self.request(|reply| Command::BeginHandoff { command, reply })
            .await
    }

    /// Routes a departing team.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Blocked` when no station is free, other routing
    /// errors, or `DomainError::RegistryUnavailable`.
    pub async fn resolve_handoff(
        &self,
        command: ResolveHandoff,
    ) -> Result<Handled<Routing>, DomainError> {
        self.request(|reply| Command::ResolveHandoff { command, reply })
            .await
    }

    /// Begins a handoff and attempts routing in the same step.
    ///
    /// # Errors
    ///
    /// Returns the handoff errors, or `DomainError::RegistryUnavailable`.
    pub async fn release(&self, command: BeginHandoff) -> Result<Handled<Release>, DomainError> {
        self.request(|reply| Command::Release { command, reply })
            .await
    }

    /// Forces a station's occupancy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` or
    /// `DomainError::RegistryUnavailable`.
    pub async fn force_status(
        &self,
        command: ForceStatus,
    ) -> Result<Handled<StatusChange>, DomainError> {
        self.request(|reply| Command::ForceStatus { command, reply })
            .await
    }

    /// Places a team on a station.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTeam`, `DomainError::UnknownStation` or
    /// `DomainError::RegistryUnavailable`.
    pub async fn force_assign(
        &self,
        command: ForceAssign,
    ) -> Result<Handled<ForcedAssignment>, DomainError> {
        self.request(|reply| Command::ForceAssign { command, reply })
            .await
    }

    /// Clears one station.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStation` or
    /// `DomainError::RegistryUnavailable`.
    pub async fn reset_station(
        &self,
        command: ResetStation,
    ) -> Result<Handled<TouchedStation>, DomainError> {
        self.request(|reply| Command::ResetStation { command, reply })
            .await
    }

    /// Clears every station.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RegistryUnavailable` if the worker has stopped.
    pub async fn reset_all(
        &self,
        command: ResetAll,
    ) -> Result<Handled<Vec<TouchedStation>>, DomainError> {
        self.request(|reply| Command::ResetAll { command, reply })
            .await
    }

    /// Edits a team's to-visit list.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTeam`, `DomainError::UnknownLocation` or
    /// `DomainError::RegistryUnavailable`.
    pub async fn edit_to_visit(
        &self,
        command: EditToVisit,
    ) -> Result<Handled<ToVisitEdit>, DomainError> {
        self.request(|reply| Command::EditToVisit { command, reply })
            .await
    }

    /// A consistent copy of the registry, taken between commands.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RegistryUnavailable` if the worker has stopped.
    pub async fn query(&self) -> Result<Registry, DomainError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Query { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| DomainError::RegistryUnavailable)
    }

    /// Resolves what `identity` may do.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RegistryUnavailable` if the worker has stopped.
    pub async fn role_of(&self, identity: Identity) -> Result<Role, DomainError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RoleOf {
            identity,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| DomainError::RegistryUnavailable)
    }
}
