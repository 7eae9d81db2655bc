//! # Service Component
//!
//! A component of a service within a cluster, and the owner of that
//! component's per-host lifecycle entities. A host component is created when
//! the component is assigned to a host and may only be removed once it sits in
//! `INIT` (wiped out) or `UNINSTALLED`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::ServiceComponentHost;
use crate::error::{ClusterActionError, Result};
use crate::state_machine::State;

/// Identity shared by a component and each of its host instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentIdentity {
    pub cluster_id: i64,
    pub cluster_name: String,
    pub service_name: String,
    pub component_name: String,
}

impl ComponentIdentity {
    pub fn new(
        cluster_id: i64,
        cluster_name: impl Into<String>,
        service_name: impl Into<String>,
        component_name: impl Into<String>,
    ) -> Self {
        Self {
            cluster_id,
            cluster_name: cluster_name.into(),
            service_name: service_name.into(),
            component_name: component_name.into(),
        }
    }
}

#[derive(Debug)]
pub struct ServiceComponent {
    identity: Arc<ComponentIdentity>,
    is_client: bool,
    host_components: RwLock<BTreeMap<String, Arc<ServiceComponentHost>>>,
}

impl ServiceComponent {
    pub fn new(identity: ComponentIdentity, is_client: bool) -> Self {
        Self {
            identity: Arc::new(identity),
            is_client,
            host_components: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.identity.component_name
    }

    pub fn is_client_component(&self) -> bool {
        self.is_client
    }

    /// Assign the component to a host
    pub fn add_service_component_host(
        &self,
        host_name: &str,
    ) -> Result<Arc<ServiceComponentHost>> {
        let mut hosts = self.host_components.write();
        if hosts.contains_key(host_name) {
            return Err(ClusterActionError::InvalidState(format!(
                "Component {} is already assigned to host {host_name}",
                self.name()
            )));
        }

        let host_component = Arc::new(ServiceComponentHost::new(
            Arc::clone(&self.identity),
            host_name,
            self.is_client,
        ));
        hosts.insert(host_name.to_string(), Arc::clone(&host_component));

        info!(
            cluster = %self.identity.cluster_name,
            service = %self.identity.service_name,
            component = %self.name(),
            host = %host_name,
            "Assigned component to host"
        );
        Ok(host_component)
    }

    pub fn service_component_host(&self, host_name: &str) -> Option<Arc<ServiceComponentHost>> {
        self.host_components.read().get(host_name).cloned()
    }

    pub fn service_component_hosts(&self) -> Vec<Arc<ServiceComponentHost>> {
        self.host_components.read().values().cloned().collect()
    }

    /// Remove the component from a host; it must be wiped out or uninstalled
    pub fn remove_service_component_host(
        &self,
        host_name: &str,
    ) -> Result<Arc<ServiceComponentHost>> {
        let mut hosts = self.host_components.write();
        let Some(host_component) = hosts.remove(host_name) else {
            return Err(ClusterActionError::InvalidState(format!(
                "Component {} is not assigned to host {host_name}",
                self.name()
            )));
        };

        let state = host_component.state();
        if !matches!(state, State::Init | State::Uninstalled) {
            hosts.insert(host_name.to_string(), host_component);
            return Err(ClusterActionError::InvalidState(format!(
                "Component {} on host {host_name} cannot be removed in state {state}",
                self.name()
            )));
        }

        debug!(component = %self.name(), host = %host_name, "Removed host component");
        Ok(host_component)
    }
}
