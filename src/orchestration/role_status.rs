//! # Role Status Aggregator
//!
//! Classifies one role within one stage from the statuses of its host role
//! commands. Computed fresh from the store on every tick; never persisted.
//!
//! - **Successful**: `succeeded / total >= success_factor`
//! - **In progress**: not successful and at least one command is queued or pending
//! - **Failed**: not successful and every command is terminal
//!
//! A role with no commands is vacuously successful. Callers are expected to
//! build roles from their commands, so this only arises from a malformed stage.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{HostRoleCommand, HostRoleStatus};

/// Three-way outcome of a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClassification {
    Successful,
    InProgress,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoleStatus {
    pub num_queued: usize,
    pub num_pending: usize,
    pub num_succeeded: usize,
    pub num_failed: usize,
    pub num_timed_out: usize,
    pub num_aborted: usize,
    pub total_hosts: usize,
    pub success_factor: f32,
}

impl RoleStatus {
    pub fn new(total_hosts: usize, success_factor: f32) -> Self {
        Self {
            total_hosts,
            success_factor,
            ..Default::default()
        }
    }

    pub fn from_commands<'a>(
        commands: impl IntoIterator<Item = &'a HostRoleCommand>,
        success_factor: f32,
    ) -> Self {
        let mut status = Self::new(0, success_factor);
        for command in commands {
            status.total_hosts += 1;
            status.record(command.status);
        }
        status
    }

    pub fn record(&mut self, status: HostRoleStatus) {
        match status {
            HostRoleStatus::Queued => self.num_queued += 1,
            HostRoleStatus::Pending => self.num_pending += 1,
            HostRoleStatus::Completed => self.num_succeeded += 1,
            HostRoleStatus::Failed => self.num_failed += 1,
            HostRoleStatus::TimedOut => self.num_timed_out += 1,
            HostRoleStatus::Aborted => self.num_aborted += 1,
        }
    }

    pub fn is_successful(&self) -> bool {
        if self.total_hosts == 0 {
            return true;
        }
        (self.num_succeeded as f32 / self.total_hosts as f32) >= self.success_factor
    }

    pub fn is_in_progress(&self) -> bool {
        self.num_pending + self.num_queued > 0
    }

    pub fn is_failed(&self) -> bool {
        !self.is_successful() && !self.is_in_progress()
    }

    pub fn classify(&self) -> RoleClassification {
        if self.total_hosts == 0 {
            warn!(
                success_factor = self.success_factor,
                "Role has no host commands; treating as successful"
            );
        }

        if self.is_successful() {
            RoleClassification::Successful
        } else if self.is_in_progress() {
            RoleClassification::InProgress
        } else {
            RoleClassification::Failed
        }
    }
}
