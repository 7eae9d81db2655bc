//! # Orchestration
//!
//! The action scheduler and the role status aggregation its decisions rest on.
//!
//! ## Core Components
//!
//! - **ActionScheduler**: periodic, cancellable loop that reschedules expired
//!   commands, times out exhausted ones and aborts requests with failed roles
//! - **RoleStatus**: per-tick classification of a role within a stage
//! - **TickResult**: what a single tick did and decided

pub mod action_scheduler;
pub mod role_status;
pub mod types;

pub use action_scheduler::ActionScheduler;
pub use role_status::{RoleClassification, RoleStatus};
pub use types::{TickOutcome, TickResult};
