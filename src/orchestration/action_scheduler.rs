//! # Action Scheduler
//!
//! Background loop that drives queued stages to completion. Each tick reads the
//! queued stages from the task database, re-enqueues commands whose attempt has
//! expired, times out commands whose final attempt has expired, and aborts any
//! request holding a failed role.
//!
//! Stages are evaluated strictly in store order: evaluation stops at the first
//! stage that still has a role in progress, so later stages never run ahead of
//! an unresolved earlier one.
//!
//! The loop is cooperative. `stop` is observed between ticks or during the poll
//! sleep; an in-flight tick always runs to completion. A stopped scheduler
//! cannot be started again.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::role_status::{RoleClassification, RoleStatus};
use super::types::{TickOutcome, TickResult};
use crate::config::{ConfigurationError, SchedulerConfig};
use crate::constants::system;
use crate::database::ActionDbAccessor;
use crate::error::{ClusterActionError, Result};
use crate::logging::{log_command_operation, log_error, log_scheduler_operation};
use crate::messaging::ActionQueue;
use crate::models::{ExecutionCommand, HostRoleCommand, HostRoleStatus, Role, Stage};
use crate::utils::{Clock, SystemClock};

const PHASE_IDLE: u8 = 0;
const PHASE_RUNNING: u8 = 1;
const PHASE_STOPPED: u8 = 2;

/// Per-role view of a stage: role -> host -> command
type RoleCommandMap = BTreeMap<Role, BTreeMap<String, HostRoleCommand>>;

pub struct ActionScheduler {
    id: Uuid,
    poll_interval: Duration,
    action_timeout_ms: i64,
    stop_timeout: Duration,
    db: Arc<dyn ActionDbAccessor>,
    action_queue: Arc<dyn ActionQueue>,
    clock: Arc<dyn Clock>,
    phase: AtomicU8,
    shutdown_notify: Notify,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for ActionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionScheduler")
            .field("id", &self.id)
            .field("poll_interval", &self.poll_interval)
            .field("action_timeout_ms", &self.action_timeout_ms)
            .field("phase", &self.phase.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl ActionScheduler {
    pub fn new(
        config: &SchedulerConfig,
        db: Arc<dyn ActionDbAccessor>,
        action_queue: Arc<dyn ActionQueue>,
    ) -> Result<Self> {
        Self::with_clock(config, db, action_queue, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &SchedulerConfig,
        db: Arc<dyn ActionDbAccessor>,
        action_queue: Arc<dyn ActionQueue>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let action_timeout_ms = i64::try_from(config.action_timeout_ms).map_err(|_| {
            ConfigurationError::invalid_value("scheduler.action_timeout_ms", "too large")
        })?;

        Ok(Self {
            id: Uuid::new_v4(),
            poll_interval: config.poll_interval(),
            action_timeout_ms,
            stop_timeout: config.stop_timeout(),
            db,
            action_queue,
            clock,
            phase: AtomicU8::new(PHASE_IDLE),
            shutdown_notify: Notify::new(),
            loop_handle: Mutex::new(None),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.phase.load(Ordering::Acquire) == PHASE_RUNNING
    }

    pub fn is_stopped(&self) -> bool {
        self.phase.load(Ordering::Acquire) == PHASE_STOPPED
    }

    /// Spawn the background loop on the current tokio runtime.
    ///
    /// The loop holds only a weak reference; dropping the last `Arc` ends it
    /// after the current tick.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        if let Err(phase) = self.phase.compare_exchange(
            PHASE_IDLE,
            PHASE_RUNNING,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            let reason = if phase == PHASE_RUNNING {
                "Action scheduler is already running"
            } else {
                "Action scheduler has been stopped and cannot be restarted"
            };
            return Err(ClusterActionError::InvalidState(reason.to_string()));
        }

        let scheduler_id = self.id.to_string();
        log_scheduler_operation(
            "start",
            &scheduler_id,
            "running",
            Some(&format!(
                "poll_interval_ms={} action_timeout_ms={}",
                self.poll_interval.as_millis(),
                self.action_timeout_ms
            )),
        );

        let handle = tokio::spawn(Self::run_loop(Arc::downgrade(self), self.id));
        *self.loop_handle.lock() = Some(handle);
        Ok(())
    }

    /// Request the loop to stop; returns immediately
    pub fn stop(&self) {
        let previous = self.phase.swap(PHASE_STOPPED, Ordering::AcqRel);
        if previous != PHASE_STOPPED {
            // Stores a permit if the loop is mid-tick rather than sleeping
            self.shutdown_notify.notify_one();
            log_scheduler_operation("stop", &self.id.to_string(), "stopping", None);
        }
    }

    /// Stop the loop and wait for it to exit, up to the configured stop timeout
    pub async fn shutdown(&self) -> Result<()> {
        self.stop();
        let handle = self.loop_handle.lock().take();
        let Some(mut handle) = handle else {
            return Ok(());
        };

        match tokio::time::timeout(self.stop_timeout, &mut handle).await {
            Ok(Ok(())) => {
                log_scheduler_operation("shutdown", &self.id.to_string(), "stopped", None);
                Ok(())
            }
            Ok(Err(join_error)) => {
                log_error(
                    "action_scheduler",
                    "shutdown",
                    &join_error.to_string(),
                    Some(&self.id.to_string()),
                );
                Ok(())
            }
            Err(_) => {
                handle.abort();
                Err(ClusterActionError::Timeout(format!(
                    "Action scheduler did not stop within {}ms",
                    self.stop_timeout.as_millis()
                )))
            }
        }
    }

    async fn run_loop(weak: Weak<Self>, scheduler_id: Uuid) {
        info!(scheduler_id = %scheduler_id, "Starting action scheduler loop");

        loop {
            let Some(scheduler) = weak.upgrade() else {
                warn!(scheduler_id = %scheduler_id, "Action scheduler dropped during loop");
                break;
            };
            if !scheduler.is_running() {
                break;
            }

            scheduler.run_tick().await;

            tokio::select! {
                _ = tokio::time::sleep(scheduler.poll_interval) => {},
                _ = scheduler.shutdown_notify.notified() => {
                    debug!(scheduler_id = %scheduler_id, "Shutdown notification received");
                    break;
                }
            }
        }

        info!(scheduler_id = %scheduler_id, "Action scheduler loop ended");
    }

    /// Run one tick on its own task so a panic is contained to that tick
    async fn run_tick(self: &Arc<Self>) {
        let scheduler = Arc::clone(self);
        match tokio::spawn(async move { scheduler.do_work().await }).await {
            Ok(Ok(result)) => {
                debug!(
                    scheduler_id = %self.id,
                    stages_evaluated = result.stages_evaluated,
                    commands_rescheduled = result.commands_rescheduled,
                    commands_timed_out = result.commands_timed_out,
                    outcome = ?result.outcome,
                    "Scheduler tick complete"
                );
            }
            Ok(Err(e)) => {
                log_error(
                    "action_scheduler",
                    "tick",
                    &e.to_string(),
                    Some(&self.id.to_string()),
                );
            }
            Err(join_error) => {
                log_error(
                    "action_scheduler",
                    "tick",
                    &join_error.to_string(),
                    Some("tick task panicked or was cancelled"),
                );
            }
        }
    }

    /// Evaluate every queued stage once.
    ///
    /// Collaborator errors are returned as-is; the loop logs them and retries on
    /// the next interval.
    pub async fn do_work(&self) -> Result<TickResult> {
        let stages = self.db.get_queued_stages().await?;
        let mut result = TickResult::default();
        if stages.is_empty() {
            return Ok(result);
        }

        for stage in &stages {
            result.stages_evaluated += 1;
            let mut role_map = Self::commands_by_role(stage);
            let mut stage_in_progress = false;

            for (role, commands) in role_map.iter_mut() {
                self.process_pendings_and_reschedule(stage, commands, &mut result)
                    .await?;

                let status =
                    RoleStatus::from_commands(commands.values(), stage.success_factor(*role));
                match status.classify() {
                    RoleClassification::Successful => {}
                    RoleClassification::InProgress => stage_in_progress = true,
                    RoleClassification::Failed => {
                        warn!(
                            request_id = stage.request_id(),
                            stage_id = stage.stage_id(),
                            role = %role,
                            succeeded = status.num_succeeded,
                            total = status.total_hosts,
                            success_factor = status.success_factor,
                            "Role failed; aborting request"
                        );
                        self.db.abort_operation(stage.request_id()).await?;
                        result.outcome = TickOutcome::Aborted {
                            request_id: stage.request_id(),
                            stage_id: stage.stage_id(),
                            role: *role,
                        };
                        return Ok(result);
                    }
                }
            }

            if stage_in_progress {
                result.outcome = TickOutcome::Waiting {
                    request_id: stage.request_id(),
                    stage_id: stage.stage_id(),
                };
                return Ok(result);
            }
        }

        result.outcome = TickOutcome::AllSuccessful;
        Ok(result)
    }

    fn commands_by_role(stage: &Stage) -> RoleCommandMap {
        let mut role_map = RoleCommandMap::new();
        for command in stage.host_role_commands() {
            role_map
                .entry(command.role)
                .or_default()
                .insert(command.host_name.clone(), command.clone());
        }
        role_map
    }

    /// Reschedule or time out every expired outstanding command of one role.
    ///
    /// Local copies are updated alongside the store so the role's status for
    /// this tick reflects the decisions just made.
    async fn process_pendings_and_reschedule(
        &self,
        stage: &Stage,
        commands: &mut BTreeMap<String, HostRoleCommand>,
        result: &mut TickResult,
    ) -> Result<()> {
        for command in commands.values_mut() {
            if command.status.is_terminal() {
                continue;
            }

            let now = self.clock.now_millis();
            if !command.is_expired(now) {
                continue;
            }

            if command.is_finally_expired(now, self.action_timeout_ms, system::MAX_ATTEMPTS) {
                log_command_operation(
                    "timeout",
                    stage.request_id(),
                    stage.stage_id(),
                    &command.host_name,
                    command.role,
                    Some("final attempt expired"),
                );
                self.db
                    .timeout_host_role(
                        stage.request_id(),
                        stage.stage_id(),
                        &command.host_name,
                        command.role,
                    )
                    .await?;
                command.status = HostRoleStatus::TimedOut;
                result.commands_timed_out += 1;
            } else {
                log_command_operation(
                    "reschedule",
                    stage.request_id(),
                    stage.stage_id(),
                    &command.host_name,
                    command.role,
                    None,
                );
                self.db
                    .update_host_role_expiry(
                        stage.request_id(),
                        stage.stage_id(),
                        &command.host_name,
                        command.role,
                        now,
                    )
                    .await?;
                command.expiry_time = now;
                self.action_queue
                    .enqueue(
                        &command.host_name,
                        ExecutionCommand::for_host_role(stage, command),
                    )
                    .await?;
                result.commands_rescheduled += 1;
            }
        }
        Ok(())
    }
}
