//! # Transition Side Effects
//!
//! Operation bookkeeping applied on every lifecycle transition. A started
//! operation clears all three timestamps and records its start, a progress
//! report moves the last-update time, and a completion records both the last
//! update and the end.

use serde::{Deserialize, Serialize};

use super::transitions::TransitionKind;
use crate::constants::system::UNSET_TIMESTAMP;

/// Timestamps of the last operation run against a host component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpTimestamps {
    pub start: i64,
    pub last_update: i64,
    pub end: i64,
}

impl Default for OpTimestamps {
    fn default() -> Self {
        Self {
            start: UNSET_TIMESTAMP,
            last_update: UNSET_TIMESTAMP,
            end: UNSET_TIMESTAMP,
        }
    }
}

impl OpTimestamps {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, kind: TransitionKind, time: i64) {
        match kind {
            TransitionKind::OpStarted => {
                self.reset();
                self.start = time;
            }
            TransitionKind::OpInProgress => {
                self.last_update = time;
            }
            TransitionKind::OpCompleted => {
                self.last_update = time;
                self.end = time;
            }
        }
    }

    /// `start <= last_update <= end` over whichever of the three are set
    pub fn is_ordered(&self) -> bool {
        let set: Vec<i64> = [self.start, self.last_update, self.end]
            .into_iter()
            .filter(|t| *t != UNSET_TIMESTAMP)
            .collect();
        set.windows(2).all(|pair| pair[0] <= pair[1])
    }
}
