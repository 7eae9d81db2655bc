//! # Data Model
//!
//! Records the scheduler works over (stages, host role commands, execution
//! commands) and the per-host component lifecycle entities.

pub mod config;
pub mod execution_command;
pub mod host_role_command;
pub mod role;
pub mod service_component;
pub mod service_component_host;
pub mod stage;

pub use config::{Config, StackVersion};
pub use execution_command::ExecutionCommand;
pub use host_role_command::{HostRoleCommand, HostRoleStatus};
pub use role::Role;
pub use service_component::{ComponentIdentity, ServiceComponent};
pub use service_component_host::{
    LifecycleSnapshot, ServiceComponentHost, ServiceComponentHostResponse,
};
pub use stage::{HostAction, Stage};
