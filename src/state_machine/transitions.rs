//! # Transition Tables
//!
//! Static `(state, event) -> (state, side effect)` lookup for both component
//! topologies. Runnable components support the full install, start, stop cycle;
//! client components have no running process, so every edge touching
//! `STARTING`, `STARTED`, `STOPPING`, `START_FAILED` or `STOP_FAILED` is absent.

use serde::{Deserialize, Serialize};

use super::events::ServiceComponentHostEventType as Event;
use super::states::State;

/// Edge set a component's state machine uses, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Daemon-style component with a running process
    Runnable,
    /// Install-only component with no running process
    Client,
}

impl Topology {
    pub fn for_component(is_client: bool) -> Self {
        if is_client {
            Self::Client
        } else {
            Self::Runnable
        }
    }

    fn table(&self) -> &'static [TransitionRule] {
        match self {
            Self::Runnable => RUNNABLE_TRANSITIONS,
            Self::Client => CLIENT_TRANSITIONS,
        }
    }
}

/// Operation bookkeeping performed alongside a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    OpStarted,
    OpInProgress,
    OpCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: State,
    pub event: Event,
    pub to: State,
    pub kind: TransitionKind,
}

const fn rule(from: State, event: Event, to: State, kind: TransitionKind) -> TransitionRule {
    TransitionRule {
        from,
        event,
        to,
        kind,
    }
}

use self::TransitionKind::{OpCompleted, OpInProgress, OpStarted};

/// Runnable components: every edge
pub const RUNNABLE_TRANSITIONS: &[TransitionRule] = &[
    rule(State::Init, Event::Install, State::Installing, OpStarted),
    rule(State::Installing, Event::OpInProgress, State::Installing, OpInProgress),
    rule(State::Installing, Event::OpSucceeded, State::Installed, OpCompleted),
    rule(State::Installing, Event::OpFailed, State::InstallFailed, OpCompleted),
    rule(State::InstallFailed, Event::OpRestart, State::Installing, OpStarted),
    rule(State::Installed, Event::Start, State::Starting, OpStarted),
    rule(State::Installed, Event::Uninstall, State::Uninstalling, OpStarted),
    rule(State::Installed, Event::Install, State::Installing, OpStarted),
    rule(State::Starting, Event::OpInProgress, State::Starting, OpInProgress),
    rule(State::Starting, Event::OpSucceeded, State::Started, OpCompleted),
    rule(State::Starting, Event::OpFailed, State::StartFailed, OpCompleted),
    rule(State::StartFailed, Event::OpRestart, State::Starting, OpStarted),
    rule(State::Started, Event::Stop, State::Stopping, OpStarted),
    rule(State::Stopping, Event::OpInProgress, State::Stopping, OpInProgress),
    rule(State::Stopping, Event::OpSucceeded, State::Installed, OpCompleted),
    rule(State::Stopping, Event::OpFailed, State::StopFailed, OpCompleted),
    rule(State::StopFailed, Event::OpRestart, State::Stopping, OpStarted),
    rule(State::Uninstalling, Event::OpInProgress, State::Uninstalling, OpInProgress),
    rule(State::Uninstalling, Event::OpSucceeded, State::Uninstalled, OpCompleted),
    rule(State::Uninstalling, Event::OpFailed, State::UninstallFailed, OpCompleted),
    rule(State::UninstallFailed, Event::OpRestart, State::Uninstalling, OpStarted),
    rule(State::Uninstalled, Event::Install, State::Installing, OpStarted),
    rule(State::Uninstalled, Event::Wipeout, State::WipingOut, OpStarted),
    rule(State::WipingOut, Event::OpInProgress, State::WipingOut, OpInProgress),
    rule(State::WipingOut, Event::OpSucceeded, State::Init, OpCompleted),
    rule(State::WipingOut, Event::OpFailed, State::WipeoutFailed, OpCompleted),
    rule(State::WipeoutFailed, Event::OpRestart, State::WipingOut, OpStarted),
];

/// Client components: install, uninstall and wipe-out only
pub const CLIENT_TRANSITIONS: &[TransitionRule] = &[
    rule(State::Init, Event::Install, State::Installing, OpStarted),
    rule(State::Installing, Event::OpInProgress, State::Installing, OpInProgress),
    rule(State::Installing, Event::OpSucceeded, State::Installed, OpCompleted),
    rule(State::Installing, Event::OpFailed, State::InstallFailed, OpCompleted),
    rule(State::InstallFailed, Event::OpRestart, State::Installing, OpStarted),
    rule(State::Installed, Event::Uninstall, State::Uninstalling, OpStarted),
    rule(State::Installed, Event::Install, State::Installing, OpStarted),
    rule(State::Uninstalling, Event::OpInProgress, State::Uninstalling, OpInProgress),
    rule(State::Uninstalling, Event::OpSucceeded, State::Uninstalled, OpCompleted),
    rule(State::Uninstalling, Event::OpFailed, State::UninstallFailed, OpCompleted),
    rule(State::UninstallFailed, Event::OpRestart, State::Uninstalling, OpStarted),
    rule(State::Uninstalled, Event::Install, State::Installing, OpStarted),
    rule(State::Uninstalled, Event::Wipeout, State::WipingOut, OpStarted),
    rule(State::WipingOut, Event::OpInProgress, State::WipingOut, OpInProgress),
    rule(State::WipingOut, Event::OpSucceeded, State::Init, OpCompleted),
    rule(State::WipingOut, Event::OpFailed, State::WipeoutFailed, OpCompleted),
    rule(State::WipeoutFailed, Event::OpRestart, State::WipingOut, OpStarted),
];

/// Find the edge for `(from, event)` in a topology, if one exists
pub fn lookup(topology: Topology, from: State, event: Event) -> Option<TransitionRule> {
    topology
        .table()
        .iter()
        .find(|rule| rule.from == from && rule.event == event)
        .copied()
}

/// Events accepted in a state under a topology
pub fn valid_events(topology: Topology, from: State) -> Vec<Event> {
    topology
        .table()
        .iter()
        .filter(|rule| rule.from == from)
        .map(|rule| rule.event)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const RUNNABLE_ONLY_STATES: &[State] = &[
        State::Starting,
        State::Started,
        State::StartFailed,
        State::Stopping,
        State::StopFailed,
    ];

    #[test]
    fn test_tables_have_unique_keys() {
        for topology in [Topology::Runnable, Topology::Client] {
            let mut seen = HashSet::new();
            for rule in topology.table() {
                assert!(
                    seen.insert((rule.from, rule.event)),
                    "duplicate edge {} --{}--> in {topology:?}",
                    rule.from,
                    rule.event
                );
            }
        }
    }

    #[test]
    fn test_client_table_is_runnable_minus_process_states() {
        let expected: Vec<TransitionRule> = RUNNABLE_TRANSITIONS
            .iter()
            .filter(|r| !RUNNABLE_ONLY_STATES.contains(&r.from))
            .filter(|r| !RUNNABLE_ONLY_STATES.contains(&r.to))
            .copied()
            .collect();
        assert_eq!(CLIENT_TRANSITIONS, expected.as_slice());
    }

    #[test]
    fn test_kind_follows_event() {
        for rule in RUNNABLE_TRANSITIONS {
            let expected = match rule.event {
                Event::OpInProgress => OpInProgress,
                Event::OpSucceeded | Event::OpFailed => OpCompleted,
                _ => OpStarted,
            };
            assert_eq!(rule.kind, expected, "{} --{}-->", rule.from, rule.event);
        }
    }

    #[test]
    fn test_every_failed_state_restarts() {
        for topology in [Topology::Runnable, Topology::Client] {
            for state in State::ALL.iter().filter(|s| s.is_failed()) {
                if topology == Topology::Client && RUNNABLE_ONLY_STATES.contains(state) {
                    continue;
                }
                let rule = lookup(topology, *state, Event::OpRestart)
                    .unwrap_or_else(|| panic!("{state} has no restart edge"));
                assert!(rule.to.is_in_progress());
            }
        }
    }

    #[test]
    fn test_start_only_for_runnable() {
        assert_eq!(
            lookup(Topology::Runnable, State::Installed, Event::Start).map(|r| r.to),
            Some(State::Starting)
        );
        assert!(lookup(Topology::Client, State::Installed, Event::Start).is_none());
        assert_eq!(
            valid_events(Topology::Client, State::Installed),
            vec![Event::Uninstall, Event::Install]
        );
    }
}
