//! Response bodies shared by mutating endpoints.

use questline_registry::application::command_handlers::Handled;
use questline_registry::domain::notifications::Notification;
use serde::Serialize;
use uuid::Uuid;

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse<T> {
    /// IDs of the audit events produced.
    pub event_ids: Vec<Uuid>,
    /// Messages for the caretakers of the stations involved.
    pub notifications: Vec<Notification>,
    /// Whether the snapshot was saved after the command.
    pub persisted: bool,
    /// The operation-specific result.
    #[serde(flatten)]
    pub result: T,
}

impl<T> From<Handled<T>> for CommandResponse<T> {
    fn from(handled: Handled<T>) -> Self {
        Self {
            event_ids: handled.event_ids(),
            notifications: handled.notifications,
            persisted: handled.persisted,
            result: handled.value,
        }
    }
}
