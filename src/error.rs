use thiserror::Error;

use crate::config::ConfigurationError;
use crate::state_machine::StateMachineError;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum ClusterActionError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Action queue error: {0}")]
    Queue(String),

    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, ClusterActionError>;

/// Helper for collaborator implementations reporting store failures
pub fn database_error(msg: impl Into<String>) -> ClusterActionError {
    ClusterActionError::Database(msg.into())
}
