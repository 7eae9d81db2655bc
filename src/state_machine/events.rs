use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types that drive host component lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceComponentHostEventType {
    Install,
    Start,
    Stop,
    Uninstall,
    Wipeout,
    OpInProgress,
    OpSucceeded,
    OpFailed,
    OpRestart,
}

impl ServiceComponentHostEventType {
    pub const ALL: &'static [ServiceComponentHostEventType] = &[
        Self::Install,
        Self::Start,
        Self::Stop,
        Self::Uninstall,
        Self::Wipeout,
        Self::OpInProgress,
        Self::OpSucceeded,
        Self::OpFailed,
        Self::OpRestart,
    ];

    /// Get a string representation of the event type for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "INSTALL",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::Uninstall => "UNINSTALL",
            Self::Wipeout => "WIPEOUT",
            Self::OpInProgress => "OP_IN_PROGRESS",
            Self::OpSucceeded => "OP_SUCCEEDED",
            Self::OpFailed => "OP_FAILED",
            Self::OpRestart => "OP_RESTART",
        }
    }

    /// Check if this event reports on an operation already underway
    pub fn is_op_report(&self) -> bool {
        matches!(
            self,
            Self::OpInProgress | Self::OpSucceeded | Self::OpFailed
        )
    }
}

impl fmt::Display for ServiceComponentHostEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable transition request for a host component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceComponentHostEvent {
    pub event_type: ServiceComponentHostEventType,
    /// Epoch millis at which the operation step happened
    pub op_timestamp: i64,
}

impl ServiceComponentHostEvent {
    pub fn new(event_type: ServiceComponentHostEventType, op_timestamp: i64) -> Self {
        Self {
            event_type,
            op_timestamp,
        }
    }

    pub fn install(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::Install, op_timestamp)
    }

    pub fn start(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::Start, op_timestamp)
    }

    pub fn stop(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::Stop, op_timestamp)
    }

    pub fn uninstall(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::Uninstall, op_timestamp)
    }

    pub fn wipeout(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::Wipeout, op_timestamp)
    }

    pub fn in_progress(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::OpInProgress, op_timestamp)
    }

    pub fn succeeded(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::OpSucceeded, op_timestamp)
    }

    pub fn failed(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::OpFailed, op_timestamp)
    }

    pub fn restart(op_timestamp: i64) -> Self {
        Self::new(ServiceComponentHostEventType::OpRestart, op_timestamp)
    }
}

impl fmt::Display for ServiceComponentHostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.event_type, self.op_timestamp)
    }
}
