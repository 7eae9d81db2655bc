//! Proptest strategies for scheduler and lifecycle properties.

use proptest::prelude::*;

use cluster_action_core::models::HostRoleStatus;
use cluster_action_core::status_groups;
use cluster_action_core::state_machine::ServiceComponentHostEventType;

pub fn host_role_status_strategy() -> impl Strategy<Value = HostRoleStatus> {
    prop::sample::select(HostRoleStatus::ALL.to_vec())
}

pub fn terminal_status_strategy() -> impl Strategy<Value = HostRoleStatus> {
    prop::sample::select(status_groups::TERMINAL_STATUSES.to_vec())
}

pub fn outstanding_status_strategy() -> impl Strategy<Value = HostRoleStatus> {
    prop::sample::select(status_groups::OUTSTANDING_STATUSES.to_vec())
}

pub fn unsuccessful_status_strategy() -> impl Strategy<Value = HostRoleStatus> {
    prop::sample::select(status_groups::UNSUCCESSFUL_STATUSES.to_vec())
}

/// Statuses for one role's hosts, never empty
pub fn role_statuses_strategy() -> impl Strategy<Value = Vec<HostRoleStatus>> {
    prop::collection::vec(host_role_status_strategy(), 1..24)
}

pub fn success_factor_strategy() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0f32),
        Just(0.5f32),
        Just(1.0f32),
        (0u32..=100).prop_map(|pct| pct as f32 / 100.0),
    ]
}

pub fn event_type_strategy() -> impl Strategy<Value = ServiceComponentHostEventType> {
    prop::sample::select(ServiceComponentHostEventType::ALL.to_vec())
}
