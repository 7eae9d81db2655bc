//! # Host Role Command
//!
//! The unit of scheduled work: one role executed on one host within one stage.
//!
//! Status only moves toward a terminal outcome. A reschedule re-arms the expiry
//! time without touching the status or the identity of the command.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Role;

/// Execution status of a host role command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostRoleStatus {
    /// Waiting to be sent to the host
    Queued,
    /// Sent to the host, no result yet
    Pending,
    Completed,
    Failed,
    #[serde(rename = "TIMEDOUT")]
    TimedOut,
    Aborted,
}

impl HostRoleStatus {
    pub const ALL: &'static [HostRoleStatus] = &[
        Self::Queued,
        Self::Pending,
        Self::Completed,
        Self::Failed,
        Self::TimedOut,
        Self::Aborted,
    ];

    /// Check if this is a terminal status (no further changes expected)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::TimedOut | Self::Aborted
        )
    }

    /// Check if the command still counts as outstanding work
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Queued | Self::Pending)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for HostRoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "QUEUED"),
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::TimedOut => write!(f, "TIMEDOUT"),
            Self::Aborted => write!(f, "ABORTED"),
        }
    }
}

impl std::str::FromStr for HostRoleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(Self::Queued),
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            "TIMEDOUT" => Ok(Self::TimedOut),
            "ABORTED" => Ok(Self::Aborted),
            _ => Err(format!("Invalid host role status: {s}")),
        }
    }
}

impl Default for HostRoleStatus {
    fn default() -> Self {
        Self::Queued
    }
}

/// One role's task instance on one host, with its status and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRoleCommand {
    pub host_name: String,
    pub role: Role,
    pub status: HostRoleStatus,
    /// Epoch millis of the first dispatch
    pub start_time: i64,
    /// Epoch millis after which the current attempt is considered lost
    pub expiry_time: i64,
}

impl HostRoleCommand {
    /// Create a queued command whose first attempt expires `action_timeout_ms` after `start_time`
    pub fn new(
        host_name: impl Into<String>,
        role: Role,
        start_time: i64,
        action_timeout_ms: i64,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            role,
            status: HostRoleStatus::Queued,
            start_time,
            expiry_time: start_time.saturating_add(action_timeout_ms),
        }
    }

    pub fn with_status(mut self, status: HostRoleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_expiry_time(mut self, expiry_time: i64) -> Self {
        self.expiry_time = expiry_time;
        self
    }

    /// Whether `now` is past the current attempt's expiry
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expiry_time
    }

    /// Whether `now` is past the deadline of the final allowed attempt.
    ///
    /// Deadlines saturate at `i64::MAX` instead of wrapping.
    pub fn is_finally_expired(&self, now: i64, action_timeout_ms: i64, max_attempts: i64) -> bool {
        now > self
            .start_time
            .saturating_add(action_timeout_ms.saturating_mul(max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal_check() {
        assert!(HostRoleStatus::Completed.is_terminal());
        assert!(HostRoleStatus::Failed.is_terminal());
        assert!(HostRoleStatus::TimedOut.is_terminal());
        assert!(HostRoleStatus::Aborted.is_terminal());
        assert!(!HostRoleStatus::Queued.is_terminal());
        assert!(!HostRoleStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_string_conversion() {
        assert_eq!(HostRoleStatus::TimedOut.to_string(), "TIMEDOUT");
        assert_eq!(
            "PENDING".parse::<HostRoleStatus>().unwrap(),
            HostRoleStatus::Pending
        );
        assert!("timed_out".parse::<HostRoleStatus>().is_err());

        let json = serde_json::to_string(&HostRoleStatus::TimedOut).unwrap();
        assert_eq!(json, "\"TIMEDOUT\"");
    }

    #[test]
    fn test_expiry_windows() {
        let hrc = HostRoleCommand::new("h1", Role::Datanode, 1_000, 100);
        assert_eq!(hrc.expiry_time, 1_100);

        assert!(!hrc.is_expired(1_100));
        assert!(hrc.is_expired(1_101));

        assert!(!hrc.is_finally_expired(1_200, 100, 2));
        assert!(hrc.is_finally_expired(1_201, 100, 2));
    }

    #[test]
    fn test_huge_timeout_saturates_deadlines() {
        let start = 1_700_000_000_000;
        let timeout = i64::MAX / 2;
        let hrc = HostRoleCommand::new("h1", Role::Datanode, start, timeout);
        assert_eq!(hrc.expiry_time, i64::MAX);

        assert!(!hrc.is_finally_expired(start + 1, timeout, 2));
        assert!(!hrc.is_finally_expired(i64::MAX, timeout, 2));
    }
}
