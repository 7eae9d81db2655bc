//! Execution commands: the payload the scheduler places on a host's queue
//! each time a host role command is (re)delivered.

use serde::{Deserialize, Serialize};

use super::{HostRoleCommand, Stage};

/// Command placed on a host's queue for the remote agent to execute.
///
/// Delivery is at-least-once; agents treat a repeated `command_id` idempotently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCommand {
    pub command_id: String,
    pub manifest: String,
}

impl ExecutionCommand {
    pub fn new(command_id: impl Into<String>, manifest: impl Into<String>) -> Self {
        Self {
            command_id: command_id.into(),
            manifest: manifest.into(),
        }
    }

    /// Rebuild the payload for a command's host from its stage
    pub fn for_host_role(stage: &Stage, command: &HostRoleCommand) -> Self {
        Self::new(stage.action_id(), stage.manifest(&command.host_name))
    }
}
