use thiserror::Error;

use super::events::ServiceComponentHostEventType;
use super::states::State;

/// Errors raised by the host component lifecycle state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition: event {event} is not valid in state {state}")]
    InvalidTransition {
        state: State,
        event: ServiceComponentHostEventType,
    },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;
