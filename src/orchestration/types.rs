//! # Orchestration Types
//!
//! Results reported by a scheduler tick.

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Decision the scheduler reached on a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// No queued stages
    #[default]
    Idle,
    /// Every role of every queued stage is successful
    AllSuccessful,
    /// Held on a stage with a role still in progress
    Waiting { request_id: i64, stage_id: i64 },
    /// A role failed and its request was aborted
    Aborted {
        request_id: i64,
        stage_id: i64,
        role: Role,
    },
}

/// Summary of one scheduler tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub stages_evaluated: usize,
    pub commands_rescheduled: usize,
    pub commands_timed_out: usize,
    pub outcome: TickOutcome,
}

impl TickResult {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, TickOutcome::Aborted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = TickOutcome::Aborted {
            request_id: 3,
            stage_id: 1,
            role: Role::Datanode,
        };
        let value = serde_json::to_value(outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "outcome": "aborted",
                "request_id": 3,
                "stage_id": 1,
                "role": "DATANODE"
            })
        );
        assert_eq!(
            serde_json::to_value(TickOutcome::Idle).unwrap(),
            serde_json::json!({ "outcome": "idle" })
        );
    }
}
