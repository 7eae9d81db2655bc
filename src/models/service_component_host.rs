//! # Service Component Host
//!
//! Lifecycle entity for one component deployed on one host.
//!
//! ## Concurrency
//!
//! Every mutable field sits behind a single reader/writer lock. Readers take the
//! read lock; a transition holds the write lock across both the state change and
//! its timestamp bookkeeping, so no reader ever sees a new state paired with the
//! previous operation's timestamps. Entities do not share locks, so transitions
//! on different hosts or components run fully in parallel.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::{ComponentIdentity, Config, StackVersion};
use crate::state_machine::{
    ComponentStateMachine, OpTimestamps, ServiceComponentHostEvent, StateMachineResult, State,
    Topology,
};

/// Point-in-time projection consumed by status reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceComponentHostResponse {
    pub cluster_name: String,
    pub service_name: String,
    pub component_name: String,
    pub host_name: String,
    /// Config type to version tag
    pub configs: HashMap<String, String>,
    pub live_state: String,
    pub stack_version: String,
    pub desired_state: String,
}

/// Consistent read of state and operation timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSnapshot {
    pub state: State,
    pub desired_state: State,
    pub op_timestamps: OpTimestamps,
}

#[derive(Debug)]
struct HostComponentState {
    state_machine: ComponentStateMachine,
    desired_state: State,
    stack_version: StackVersion,
    desired_stack_version: StackVersion,
    configs: HashMap<String, Config>,
    desired_configs: HashMap<String, Config>,
    op_timestamps: OpTimestamps,
}

#[derive(Debug)]
pub struct ServiceComponentHost {
    identity: Arc<ComponentIdentity>,
    host_name: String,
    inner: RwLock<HostComponentState>,
}

impl ServiceComponentHost {
    /// Create an entity in `INIT`; `is_client` picks the topology for its lifetime
    pub fn new(
        identity: Arc<ComponentIdentity>,
        host_name: impl Into<String>,
        is_client: bool,
    ) -> Self {
        Self {
            identity,
            host_name: host_name.into(),
            inner: RwLock::new(HostComponentState {
                state_machine: ComponentStateMachine::new(Topology::for_component(is_client)),
                desired_state: State::Init,
                stack_version: StackVersion::default(),
                desired_stack_version: StackVersion::default(),
                configs: HashMap::new(),
                desired_configs: HashMap::new(),
                op_timestamps: OpTimestamps::default(),
            }),
        }
    }

    /// Apply a lifecycle event.
    ///
    /// Fails with `InvalidTransition` when the event has no edge from the
    /// current state; nothing is mutated in that case.
    pub fn handle_event(&self, event: ServiceComponentHostEvent) -> StateMachineResult<()> {
        debug!(
            component = %self.service_component_name(),
            host = %self.host_name,
            event_type = %event.event_type,
            op_timestamp = event.op_timestamp,
            "Handling ServiceComponentHostEvent"
        );

        let mut inner = self.inner.write();
        let old_state = inner.state_machine.current_state();

        let rule = match inner.state_machine.do_transition(event.event_type) {
            Ok(rule) => rule,
            Err(e) => {
                error!(
                    component = %self.service_component_name(),
                    host = %self.host_name,
                    current_state = %old_state,
                    event_type = %event.event_type,
                    op_timestamp = event.op_timestamp,
                    "Can't handle ServiceComponentHostEvent at current state"
                );
                return Err(e);
            }
        };
        inner.op_timestamps.apply(rule.kind, event.op_timestamp);
        drop(inner);

        if old_state != rule.to {
            debug!(
                component = %self.service_component_name(),
                host = %self.host_name,
                old_state = %old_state,
                current_state = %rule.to,
                event_type = %event.event_type,
                "ServiceComponentHost transitioned to a new state"
            );
        }
        Ok(())
    }

    pub fn state(&self) -> State {
        self.inner.read().state_machine.current_state()
    }

    /// Force the current state, bypassing transition validation. Only for
    /// restoring persisted state.
    pub fn set_state(&self, state: State) {
        self.inner.write().state_machine.set_current_state(state);
    }

    pub fn desired_state(&self) -> State {
        self.inner.read().desired_state
    }

    pub fn set_desired_state(&self, state: State) {
        self.inner.write().desired_state = state;
    }

    pub fn topology(&self) -> Topology {
        self.inner.read().state_machine.topology()
    }

    pub fn is_client_component(&self) -> bool {
        self.topology() == Topology::Client
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        let inner = self.inner.read();
        LifecycleSnapshot {
            state: inner.state_machine.current_state(),
            desired_state: inner.desired_state,
            op_timestamps: inner.op_timestamps,
        }
    }

    pub fn op_timestamps(&self) -> OpTimestamps {
        self.inner.read().op_timestamps
    }

    pub fn last_op_start_time(&self) -> i64 {
        self.inner.read().op_timestamps.start
    }

    pub fn set_last_op_start_time(&self, time: i64) {
        self.inner.write().op_timestamps.start = time;
    }

    pub fn last_op_last_update_time(&self) -> i64 {
        self.inner.read().op_timestamps.last_update
    }

    pub fn set_last_op_last_update_time(&self, time: i64) {
        self.inner.write().op_timestamps.last_update = time;
    }

    pub fn last_op_end_time(&self) -> i64 {
        self.inner.read().op_timestamps.end
    }

    pub fn set_last_op_end_time(&self, time: i64) {
        self.inner.write().op_timestamps.end = time;
    }

    pub fn configs(&self) -> HashMap<String, Config> {
        self.inner.read().configs.clone()
    }

    /// Overlay configs by config type; types not named are kept
    pub fn update_configs(&self, configs: HashMap<String, Config>) {
        self.inner.write().configs.extend(configs);
    }

    pub fn desired_configs(&self) -> HashMap<String, Config> {
        self.inner.read().desired_configs.clone()
    }

    /// Overlay desired configs by config type; types not named are kept
    pub fn update_desired_configs(&self, configs: HashMap<String, Config>) {
        self.inner.write().desired_configs.extend(configs);
    }

    pub fn stack_version(&self) -> StackVersion {
        self.inner.read().stack_version.clone()
    }

    pub fn set_stack_version(&self, stack_version: StackVersion) {
        self.inner.write().stack_version = stack_version;
    }

    pub fn desired_stack_version(&self) -> StackVersion {
        self.inner.read().desired_stack_version.clone()
    }

    pub fn set_desired_stack_version(&self, stack_version: StackVersion) {
        self.inner.write().desired_stack_version = stack_version;
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn service_component_name(&self) -> &str {
        &self.identity.component_name
    }

    pub fn service_name(&self) -> &str {
        &self.identity.service_name
    }

    pub fn cluster_name(&self) -> &str {
        &self.identity.cluster_name
    }

    pub fn cluster_id(&self) -> i64 {
        self.identity.cluster_id
    }

    pub fn convert_to_response(&self) -> ServiceComponentHostResponse {
        let inner = self.inner.read();
        let configs = inner
            .configs
            .values()
            .map(|c| (c.config_type.clone(), c.version_tag.clone()))
            .collect();

        ServiceComponentHostResponse {
            cluster_name: self.identity.cluster_name.clone(),
            service_name: self.identity.service_name.clone(),
            component_name: self.identity.component_name.clone(),
            host_name: self.host_name.clone(),
            configs,
            live_state: inner.state_machine.current_state().to_string(),
            stack_version: inner.stack_version.to_string(),
            desired_state: inner.desired_state.to_string(),
        }
    }
}
