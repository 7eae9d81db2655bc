//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use cluster_action_core::config::SchedulerConfig;
use cluster_action_core::database::InMemoryActionDb;
use cluster_action_core::messaging::InMemoryActionQueue;
use cluster_action_core::models::{HostRoleCommand, Role, Stage};
use cluster_action_core::orchestration::ActionScheduler;
use cluster_action_core::utils::ManualClock;

/// Per-attempt timeout used across scheduler tests
pub const ACTION_TIMEOUT_MS: i64 = 1_000;

/// Scheduler wired to in-memory collaborators and a manual clock
pub struct SchedulerHarness {
    pub db: Arc<InMemoryActionDb>,
    pub queue: Arc<InMemoryActionQueue>,
    pub clock: Arc<ManualClock>,
    pub scheduler: Arc<ActionScheduler>,
}

impl SchedulerHarness {
    pub fn new() -> Self {
        Self::with_poll_interval(10)
    }

    pub fn with_poll_interval(poll_interval_ms: u64) -> Self {
        let db = Arc::new(InMemoryActionDb::new());
        let queue = Arc::new(InMemoryActionQueue::new());
        let clock = Arc::new(ManualClock::new(0));
        let config = SchedulerConfig {
            poll_interval_ms,
            action_timeout_ms: ACTION_TIMEOUT_MS as u64,
            stop_timeout_ms: 2_000,
        };
        let scheduler = Arc::new(
            ActionScheduler::with_clock(
                &config,
                db.clone(),
                queue.clone(),
                clock.clone(),
            )
            .expect("valid scheduler config"),
        );

        Self {
            db,
            queue,
            clock,
            scheduler,
        }
    }
}

/// Builder for stages whose commands all start at `start_time`
pub struct StageBuilder {
    stage: Stage,
    start_time: i64,
}

impl StageBuilder {
    pub fn new(request_id: i64, stage_id: i64) -> Self {
        Self {
            stage: Stage::new(request_id, stage_id),
            start_time: 0,
        }
    }

    pub fn starting_at(mut self, start_time: i64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn command(mut self, host_name: &str, role: Role) -> Self {
        self.stage
            .add_host_role_command(HostRoleCommand::new(
                host_name,
                role,
                self.start_time,
                ACTION_TIMEOUT_MS,
            ))
            .expect("unique host role");
        self
    }

    pub fn manifest(mut self, host_name: &str, manifest: &str) -> Self {
        self.stage.set_manifest(host_name, manifest);
        self
    }

    pub fn success_factor(mut self, role: Role, factor: f32) -> Self {
        self.stage.set_success_factor(role, factor);
        self
    }

    pub fn build(self) -> Stage {
        self.stage
    }
}
