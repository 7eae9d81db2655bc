//! # Action Database
//!
//! Durable store of requests, stages and host role commands, as seen by the
//! scheduler. The store is the single source of truth for command status; every
//! mutation issued here must be visible to the next `get_queued_stages` call.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::{database_error, ClusterActionError, Result};
use crate::models::{HostRoleCommand, HostRoleStatus, Role, Stage};
use crate::orchestration::RoleStatus;

/// Task database operations consumed by the action scheduler
#[async_trait]
pub trait ActionDbAccessor: Send + Sync {
    /// Stages with outstanding work, ordered by (request id, stage id)
    async fn get_queued_stages(&self) -> Result<Vec<Stage>>;

    /// Mark every unresolved command of a request as aborted
    async fn abort_operation(&self, request_id: i64) -> Result<()>;

    /// Mark one host role command as timed out
    async fn timeout_host_role(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
    ) -> Result<()>;

    /// Re-arm the expiry of a rescheduled host role command
    async fn update_host_role_expiry(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
        expiry_time: i64,
    ) -> Result<()>;
}

#[derive(Debug, Default)]
struct RequestRecord {
    stages: BTreeMap<i64, Stage>,
    aborted: bool,
}

/// In-memory task database, safe for concurrent use
#[derive(Debug, Default)]
pub struct InMemoryActionDb {
    requests: RwLock<BTreeMap<i64, RequestRecord>>,
}

impl InMemoryActionDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a request's stages; stage structure is fixed from here on
    pub fn persist_actions(&self, stages: Vec<Stage>) -> Result<()> {
        let mut requests = self.requests.write();
        if let Some(existing) = stages.iter().find(|stage| {
            requests
                .get(&stage.request_id())
                .is_some_and(|record| record.stages.contains_key(&stage.stage_id()))
        }) {
            return Err(ClusterActionError::InvalidState(format!(
                "Stage {} already persisted",
                existing.action_id()
            )));
        }

        for stage in stages {
            let record = requests.entry(stage.request_id()).or_default();
            debug!(action_id = %stage.action_id(), "Persisted stage");
            record.stages.insert(stage.stage_id(), stage);
        }
        Ok(())
    }

    pub fn get_stage(&self, request_id: i64, stage_id: i64) -> Option<Stage> {
        self.requests
            .read()
            .get(&request_id)?
            .stages
            .get(&stage_id)
            .cloned()
    }

    pub fn get_request_stages(&self, request_id: i64) -> Vec<Stage> {
        self.requests
            .read()
            .get(&request_id)
            .map(|record| record.stages.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_request_aborted(&self, request_id: i64) -> bool {
        self.requests
            .read()
            .get(&request_id)
            .map(|record| record.aborted)
            .unwrap_or(false)
    }

    pub fn get_host_role_command(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
    ) -> Option<HostRoleCommand> {
        self.requests
            .read()
            .get(&request_id)?
            .stages
            .get(&stage_id)?
            .host_role_command(host_name, role)
            .cloned()
    }

    /// Record a status reported for a command.
    ///
    /// Status only moves forward: `QUEUED -> PENDING -> terminal`, or straight
    /// from `QUEUED` to a terminal status.
    pub fn update_host_role_status(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
        status: HostRoleStatus,
    ) -> Result<()> {
        self.with_command(request_id, stage_id, host_name, role, |hrc| {
            let allowed = match (hrc.status, status) {
                (from, _) if from.is_terminal() => false,
                (HostRoleStatus::Pending, HostRoleStatus::Queued) => false,
                _ => true,
            };
            if !allowed {
                return Err(ClusterActionError::InvalidState(format!(
                    "Command {role} on {host_name} cannot move from {} to {status}",
                    hrc.status
                )));
            }
            hrc.status = status;
            Ok(())
        })
    }

    fn with_command<T>(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
        f: impl FnOnce(&mut HostRoleCommand) -> Result<T>,
    ) -> Result<T> {
        let mut requests = self.requests.write();
        let hrc = requests
            .get_mut(&request_id)
            .and_then(|record| record.stages.get_mut(&stage_id))
            .and_then(|stage| stage.host_role_command_mut(host_name, role))
            .ok_or_else(|| {
                database_error(format!(
                    "No {role} command for host {host_name} in stage {request_id}-{stage_id}"
                ))
            })?;
        f(hrc)
    }

    fn is_stage_done(stage: &Stage) -> bool {
        stage.is_resolved()
            && stage.roles().into_iter().all(|role| {
                let commands = stage.host_role_commands().filter(|hrc| hrc.role == role);
                RoleStatus::from_commands(commands, stage.success_factor(role)).is_successful()
            })
    }
}

#[async_trait]
impl ActionDbAccessor for InMemoryActionDb {
    async fn get_queued_stages(&self) -> Result<Vec<Stage>> {
        let requests = self.requests.read();
        Ok(requests
            .values()
            .filter(|record| !record.aborted)
            .flat_map(|record| record.stages.values())
            .filter(|stage| !Self::is_stage_done(stage))
            .cloned()
            .collect())
    }

    async fn abort_operation(&self, request_id: i64) -> Result<()> {
        let mut requests = self.requests.write();
        let record = requests
            .get_mut(&request_id)
            .ok_or_else(|| database_error(format!("No request {request_id}")))?;

        record.aborted = true;
        let mut aborted = 0usize;
        for stage in record.stages.values_mut() {
            for hrc in stage.host_role_commands_mut() {
                if !hrc.status.is_terminal() {
                    hrc.status = HostRoleStatus::Aborted;
                    aborted += 1;
                }
            }
        }

        info!(request_id, aborted_commands = aborted, "Aborted request");
        Ok(())
    }

    async fn timeout_host_role(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
    ) -> Result<()> {
        self.with_command(request_id, stage_id, host_name, role, |hrc| {
            if !hrc.status.is_terminal() {
                hrc.status = HostRoleStatus::TimedOut;
            }
            Ok(())
        })
    }

    async fn update_host_role_expiry(
        &self,
        request_id: i64,
        stage_id: i64,
        host_name: &str,
        role: Role,
        expiry_time: i64,
    ) -> Result<()> {
        self.with_command(request_id, stage_id, host_name, role, |hrc| {
            hrc.expiry_time = expiry_time;
            Ok(())
        })
    }
}
