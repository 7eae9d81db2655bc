//! # Lifecycle State Machine
//!
//! Deterministic finite-state machine governing install, start, stop, uninstall
//! and wipe-out progression for a component instance on a host. Transitions are
//! looked up in static per-topology tables; each edge names the operation
//! bookkeeping it performs.

pub mod actions;
pub mod component_state_machine;
pub mod errors;
pub mod events;
pub mod states;
pub mod transitions;

pub use actions::OpTimestamps;
pub use component_state_machine::ComponentStateMachine;
pub use errors::{StateMachineError, StateMachineResult};
pub use events::{ServiceComponentHostEvent, ServiceComponentHostEventType};
pub use states::State;
pub use transitions::{Topology, TransitionKind, TransitionRule};
