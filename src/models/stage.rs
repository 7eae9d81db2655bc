//! # Stage
//!
//! A unit of parallel work within a request. A stage holds, per host, the list of
//! host role commands to run there plus that host's execution manifest, and a
//! per-role success factor naming the fraction of hosts that must succeed.
//!
//! Structure is fixed once the stage is built; only command status and timing
//! beneath it change afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{HostRoleCommand, Role};
use crate::constants::system;
use crate::error::{ClusterActionError, Result};

/// Commands and manifest for a single host within a stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostAction {
    pub host_name: String,
    pub manifest: String,
    pub role_commands: Vec<HostRoleCommand>,
}

impl HostAction {
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            ..Default::default()
        }
    }

    pub fn role_command(&self, role: Role) -> Option<&HostRoleCommand> {
        self.role_commands.iter().find(|hrc| hrc.role == role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    request_id: i64,
    stage_id: i64,
    host_actions: BTreeMap<String, HostAction>,
    success_factors: HashMap<Role, f32>,
}

impl Stage {
    pub fn new(request_id: i64, stage_id: i64) -> Self {
        Self {
            request_id,
            stage_id,
            host_actions: BTreeMap::new(),
            success_factors: HashMap::new(),
        }
    }

    /// Add a command for `(host, role)`; a stage holds at most one per pair
    pub fn add_host_role_command(&mut self, command: HostRoleCommand) -> Result<()> {
        let action = self
            .host_actions
            .entry(command.host_name.clone())
            .or_insert_with(|| HostAction::new(command.host_name.clone()));

        if action.role_command(command.role).is_some() {
            return Err(ClusterActionError::InvalidState(format!(
                "Stage {} already has a {} command for host {}",
                self.action_id(),
                command.role,
                command.host_name
            )));
        }

        action.role_commands.push(command);
        Ok(())
    }

    pub fn with_host_role_command(mut self, command: HostRoleCommand) -> Result<Self> {
        self.add_host_role_command(command)?;
        Ok(self)
    }

    pub fn set_manifest(&mut self, host_name: &str, manifest: impl Into<String>) {
        self.host_actions
            .entry(host_name.to_string())
            .or_insert_with(|| HostAction::new(host_name))
            .manifest = manifest.into();
    }

    pub fn with_manifest(mut self, host_name: &str, manifest: impl Into<String>) -> Self {
        self.set_manifest(host_name, manifest);
        self
    }

    /// Set the success factor for a role, clamped to [0, 1].
    ///
    /// A NaN factor falls back to the default.
    pub fn set_success_factor(&mut self, role: Role, factor: f32) {
        let factor = if factor.is_nan() {
            system::DEFAULT_SUCCESS_FACTOR
        } else {
            factor.clamp(0.0, 1.0)
        };
        self.success_factors.insert(role, factor);
    }

    pub fn with_success_factor(mut self, role: Role, factor: f32) -> Self {
        self.set_success_factor(role, factor);
        self
    }

    /// Success factor for a role, defaulting to all hosts
    pub fn success_factor(&self, role: Role) -> f32 {
        self.success_factors
            .get(&role)
            .copied()
            .unwrap_or(system::DEFAULT_SUCCESS_FACTOR)
    }

    pub fn request_id(&self) -> i64 {
        self.request_id
    }

    pub fn stage_id(&self) -> i64 {
        self.stage_id
    }

    /// Identifier carried by commands sent to hosts for this stage
    pub fn action_id(&self) -> String {
        format!("{}-{}", self.request_id, self.stage_id)
    }

    pub fn host_actions(&self) -> &BTreeMap<String, HostAction> {
        &self.host_actions
    }

    /// Execution manifest for a host; empty when none was set
    pub fn manifest(&self, host_name: &str) -> &str {
        self.host_actions
            .get(host_name)
            .map(|action| action.manifest.as_str())
            .unwrap_or_default()
    }

    pub fn host_role_command(&self, host_name: &str, role: Role) -> Option<&HostRoleCommand> {
        self.host_actions.get(host_name)?.role_command(role)
    }

    pub(crate) fn host_role_command_mut(
        &mut self,
        host_name: &str,
        role: Role,
    ) -> Option<&mut HostRoleCommand> {
        self.host_actions
            .get_mut(host_name)?
            .role_commands
            .iter_mut()
            .find(|hrc| hrc.role == role)
    }

    pub fn host_role_commands(&self) -> impl Iterator<Item = &HostRoleCommand> {
        self.host_actions
            .values()
            .flat_map(|action| action.role_commands.iter())
    }

    pub(crate) fn host_role_commands_mut(&mut self) -> impl Iterator<Item = &mut HostRoleCommand> {
        self.host_actions
            .values_mut()
            .flat_map(|action| action.role_commands.iter_mut())
    }

    pub fn roles(&self) -> BTreeSet<Role> {
        self.host_role_commands().map(|hrc| hrc.role).collect()
    }

    /// A stage is resolved once every command beneath it is terminal
    pub fn is_resolved(&self) -> bool {
        self.host_role_commands().all(|hrc| hrc.status.is_terminal())
    }
}
