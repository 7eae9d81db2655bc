//! # System Constants
//!
//! Fixed operational boundaries of the action scheduler and the lifecycle
//! state machine, plus status groupings used when classifying host role commands.

use crate::models::HostRoleStatus;

/// Scheduler constants that are not configurable at runtime
pub mod system {
    /// Total attempts a host role command gets before it is timed out
    pub const MAX_ATTEMPTS: i64 = 2;

    /// Sentinel for an operation timestamp that has not been recorded
    pub const UNSET_TIMESTAMP: i64 = -1;

    /// Success factor used for roles that do not configure one
    pub const DEFAULT_SUCCESS_FACTOR: f32 = 1.0;

    /// Default scheduler poll interval in milliseconds
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

    /// Default per-attempt action timeout in milliseconds
    pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 600_000;

    /// Default time allowed for the scheduler loop to wind down in milliseconds
    pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 5_000;
}

/// Groupings of host role command statuses
pub mod status_groups {
    use super::HostRoleStatus;

    /// Statuses from which a command will not move again
    pub const TERMINAL_STATUSES: &[HostRoleStatus] = &[
        HostRoleStatus::Completed,
        HostRoleStatus::Failed,
        HostRoleStatus::TimedOut,
        HostRoleStatus::Aborted,
    ];

    /// Statuses that still count as outstanding work for a role
    pub const OUTSTANDING_STATUSES: &[HostRoleStatus] =
        &[HostRoleStatus::Queued, HostRoleStatus::Pending];

    /// Terminal statuses that count against a role's success factor
    pub const UNSUCCESSFUL_STATUSES: &[HostRoleStatus] = &[
        HostRoleStatus::Failed,
        HostRoleStatus::TimedOut,
        HostRoleStatus::Aborted,
    ];
}
