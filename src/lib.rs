#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cluster Action Core
//!
//! Scheduling engine that drives multi-host, multi-role cluster operations to
//! completion, and the per host-component lifecycle state machine those
//! operations advance.
//!
//! ## Architecture
//!
//! A request is an ordered list of stages. Each stage holds, per host, the role
//! commands to run there. The [`orchestration::ActionScheduler`] polls the task
//! database, releases stages strictly in order, re-enqueues commands whose
//! attempt expired without a response, times out commands that exhausted their
//! attempts and aborts any request whose role can no longer meet its success
//! factor.
//!
//! The task database and host command queue are collaborators behind the
//! [`database::ActionDbAccessor`] and [`messaging::ActionQueue`] traits. In-memory
//! implementations of both ship with the crate.
//!
//! ## Module Organization
//!
//! - [`models`] - Stages, host role commands and component lifecycle entities
//! - [`state_machine`] - Lifecycle transition tables and operation bookkeeping
//! - [`orchestration`] - Action scheduler loop and role status aggregation
//! - [`database`] - Task database seam
//! - [`messaging`] - Host command queue seam
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cluster_action_core::config::SchedulerConfig;
//! use cluster_action_core::database::InMemoryActionDb;
//! use cluster_action_core::messaging::InMemoryActionQueue;
//! use cluster_action_core::orchestration::ActionScheduler;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(InMemoryActionDb::new());
//! let queue = Arc::new(InMemoryActionQueue::new());
//! let scheduler = Arc::new(ActionScheduler::new(&SchedulerConfig::default(), db, queue)?);
//!
//! scheduler.start()?;
//! // ...
//! scheduler.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod state_machine;
pub mod utils;

pub use config::{ClusterActionConfig, ConfigManager, LoggingConfig, SchedulerConfig};
pub use constants::{status_groups, system};
pub use database::{ActionDbAccessor, InMemoryActionDb};
pub use error::{ClusterActionError, Result};
pub use messaging::{ActionQueue, InMemoryActionQueue};
pub use models::{
    ExecutionCommand, HostRoleCommand, HostRoleStatus, Role, ServiceComponent,
    ServiceComponentHost, Stage,
};
pub use orchestration::{ActionScheduler, RoleStatus, TickOutcome, TickResult};
pub use state_machine::{ServiceComponentHostEvent, State, StateMachineError};
