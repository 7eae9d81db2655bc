use super::errors::{StateMachineError, StateMachineResult};
use super::events::ServiceComponentHostEventType;
use super::states::State;
use super::transitions::{self, Topology, TransitionRule};

/// Lifecycle state machine for one component instance on one host.
///
/// Holds no lock of its own; the owning entity serializes access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStateMachine {
    topology: Topology,
    current_state: State,
}

impl ComponentStateMachine {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            current_state: State::Init,
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn current_state(&self) -> State {
        self.current_state
    }

    /// Force the current state, bypassing validation. Only for restoring
    /// persisted state.
    pub fn set_current_state(&mut self, state: State) {
        self.current_state = state;
    }

    /// Determine the edge an event would take without applying it
    pub fn determine_transition(
        &self,
        event: ServiceComponentHostEventType,
    ) -> StateMachineResult<TransitionRule> {
        transitions::lookup(self.topology, self.current_state, event).ok_or(
            StateMachineError::InvalidTransition {
                state: self.current_state,
                event,
            },
        )
    }

    /// Apply an event; on error the current state is untouched
    pub fn do_transition(
        &mut self,
        event: ServiceComponentHostEventType,
    ) -> StateMachineResult<TransitionRule> {
        let rule = self.determine_transition(event)?;
        self.current_state = rule.to;
        Ok(rule)
    }

    pub fn can_handle(&self, event: ServiceComponentHostEventType) -> bool {
        self.determine_transition(event).is_ok()
    }
}
