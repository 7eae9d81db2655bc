//! Tick-level behavior of the action scheduler against the in-memory store.

mod common;

use common::{SchedulerHarness, StageBuilder, ACTION_TIMEOUT_MS};

use cluster_action_core::database::ActionDbAccessor;
use cluster_action_core::models::{ExecutionCommand, HostRoleCommand, HostRoleStatus, Role, Stage};
use cluster_action_core::orchestration::TickOutcome;

#[tokio::test]
async fn test_command_within_first_attempt_is_left_alone() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![StageBuilder::new(1, 1)
        .command("h1", Role::Namenode)
        .build()])
        .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(result.commands_rescheduled, 0);
    assert_eq!(result.commands_timed_out, 0);
    assert_eq!(
        result.outcome,
        TickOutcome::Waiting {
            request_id: 1,
            stage_id: 1
        }
    );
    assert_eq!(h.queue.total_size(), 0);
}

#[tokio::test]
async fn test_expired_first_attempt_is_rescheduled_not_timed_out() {
    let h = SchedulerHarness::new();
    let start = 5_000;
    h.db.persist_actions(vec![StageBuilder::new(1, 1)
        .starting_at(start)
        .command("h1", Role::Datanode)
        .manifest("h1", "datanode manifest")
        .build()])
        .unwrap();

    let now = start + ACTION_TIMEOUT_MS + 1;
    h.clock.set(now);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(result.commands_rescheduled, 1);
    assert_eq!(result.commands_timed_out, 0);
    let hrc = h.db.get_host_role_command(1, 1, "h1", Role::Datanode).unwrap();
    assert_eq!(hrc.status, HostRoleStatus::Queued);
    assert_eq!(hrc.expiry_time, now);
    assert_eq!(
        h.queue.dequeue_all("h1"),
        vec![ExecutionCommand::new("1-1", "datanode manifest")]
    );
}

#[tokio::test]
async fn test_final_attempt_expiry_times_out_command() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![StageBuilder::new(1, 1)
        .command("h1", Role::Datanode)
        .command("h2", Role::Datanode)
        .build()])
        .unwrap();
    h.db.update_host_role_status(1, 1, "h2", Role::Datanode, HostRoleStatus::Pending)
        .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS * 2 + 1);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(result.commands_timed_out, 2);
    assert_eq!(result.commands_rescheduled, 0);
    for host in ["h1", "h2"] {
        let hrc = h.db.get_host_role_command(1, 1, host, Role::Datanode).unwrap();
        assert_eq!(hrc.status, HostRoleStatus::TimedOut);
    }
    // Every command now terminal and none succeeded
    assert!(result.is_aborted());
    assert!(h.db.is_request_aborted(1));
}

#[tokio::test]
async fn test_abort_leaves_later_requests_untouched() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![
        StageBuilder::new(1, 1)
            .command("h1", Role::Datanode)
            .build(),
        StageBuilder::new(1, 2)
            .starting_at(ACTION_TIMEOUT_MS * 3)
            .command("h2", Role::Datanode)
            .build(),
    ])
    .unwrap();
    h.db.persist_actions(vec![StageBuilder::new(2, 1)
        .starting_at(ACTION_TIMEOUT_MS * 10)
        .command("h3", Role::Tasktracker)
        .build()])
        .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS * 2 + 1);
    let result = h.scheduler.do_work().await.unwrap();

    assert!(result.is_aborted());
    assert_eq!(result.stages_evaluated, 1);
    // Later request untouched
    assert!(!h.db.is_request_aborted(2));
    let later = h.db.get_host_role_command(2, 1, "h3", Role::Tasktracker).unwrap();
    assert_eq!(later.status, HostRoleStatus::Queued);
}

#[tokio::test]
async fn test_timed_out_host_keeps_role_in_progress_while_siblings_run() {
    let h = SchedulerHarness::new();
    let stage = Stage::new(1, 1)
        .with_host_role_command(HostRoleCommand::new("h1", Role::Datanode, 0, ACTION_TIMEOUT_MS))
        .unwrap()
        .with_host_role_command(HostRoleCommand::new(
            "h2",
            Role::Datanode,
            5_000,
            ACTION_TIMEOUT_MS,
        ))
        .unwrap();
    h.db.persist_actions(vec![stage]).unwrap();

    h.clock.set(ACTION_TIMEOUT_MS * 2 + 1);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(result.commands_timed_out, 1);
    assert_eq!(
        result.outcome,
        TickOutcome::Waiting {
            request_id: 1,
            stage_id: 1
        }
    );
    assert!(!h.db.is_request_aborted(1));
    let h1 = h.db.get_host_role_command(1, 1, "h1", Role::Datanode).unwrap();
    assert_eq!(h1.status, HostRoleStatus::TimedOut);
}

#[tokio::test]
async fn test_repeated_ticks_age_command_through_reschedule_to_timeout() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![StageBuilder::new(3, 1)
        .command("h1", Role::HbaseMaster)
        .build()])
        .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS + 1);
    assert_eq!(h.scheduler.do_work().await.unwrap().commands_rescheduled, 1);

    h.clock.set(ACTION_TIMEOUT_MS + 500);
    assert_eq!(h.scheduler.do_work().await.unwrap().commands_rescheduled, 1);

    h.clock.set(ACTION_TIMEOUT_MS * 2 + 1);
    let result = h.scheduler.do_work().await.unwrap();
    assert_eq!(result.commands_timed_out, 1);
    assert_eq!(
        result.outcome,
        TickOutcome::Aborted {
            request_id: 3,
            stage_id: 1,
            role: Role::HbaseMaster
        }
    );
    assert_eq!(h.queue.size("h1"), 2);
}

#[tokio::test]
async fn test_failed_role_aborts_request_and_stops_evaluation() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![
        StageBuilder::new(1, 1)
            .command("h1", Role::Namenode)
            .command("h1", Role::Datanode)
            .build(),
        StageBuilder::new(1, 2)
            .command("h2", Role::Tasktracker)
            .build(),
    ])
    .unwrap();
    h.db.update_host_role_status(1, 1, "h1", Role::Namenode, HostRoleStatus::Completed)
        .unwrap();
    h.db.update_host_role_status(1, 1, "h1", Role::Datanode, HostRoleStatus::Failed)
        .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS + 1);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(
        result.outcome,
        TickOutcome::Aborted {
            request_id: 1,
            stage_id: 1,
            role: Role::Datanode
        }
    );
    assert_eq!(result.stages_evaluated, 1);
    assert_eq!(result.commands_rescheduled, 0);
    assert_eq!(h.queue.total_size(), 0);

    assert!(h.db.is_request_aborted(1));
    let later = h.db.get_host_role_command(1, 2, "h2", Role::Tasktracker).unwrap();
    assert_eq!(later.status, HostRoleStatus::Aborted);
    let failed = h.db.get_host_role_command(1, 1, "h1", Role::Datanode).unwrap();
    assert_eq!(failed.status, HostRoleStatus::Failed);
    assert!(h.db.get_queued_stages().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_in_progress_roles_finish_timeout_processing_then_wait() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![
        StageBuilder::new(1, 1)
            .command("h1", Role::Datanode)
            .command("h2", Role::Tasktracker)
            .build(),
        StageBuilder::new(1, 2)
            .command("h3", Role::HbaseRegionserver)
            .build(),
    ])
    .unwrap();

    h.clock.set(ACTION_TIMEOUT_MS + 1);
    let result = h.scheduler.do_work().await.unwrap();

    assert_eq!(
        result.outcome,
        TickOutcome::Waiting {
            request_id: 1,
            stage_id: 1
        }
    );
    assert!(!h.db.is_request_aborted(1));
    // Both roles of the held stage were rescheduled
    assert_eq!(result.commands_rescheduled, 2);
    assert_eq!(h.queue.size("h1"), 1);
    assert_eq!(h.queue.size("h2"), 1);
    // The next stage was never evaluated
    assert_eq!(result.stages_evaluated, 1);
    assert_eq!(h.queue.size("h3"), 0);
}

#[tokio::test]
async fn test_later_failed_role_aborts_after_earlier_in_progress_role() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![StageBuilder::new(1, 1)
        .command("h1", Role::Datanode)
        .command("h2", Role::ZookeeperServer)
        .build()])
        .unwrap();
    h.db.update_host_role_status(1, 1, "h2", Role::ZookeeperServer, HostRoleStatus::Failed)
        .unwrap();

    let result = h.scheduler.do_work().await.unwrap();
    assert_eq!(
        result.outcome,
        TickOutcome::Aborted {
            request_id: 1,
            stage_id: 1,
            role: Role::ZookeeperServer
        }
    );
}

#[tokio::test]
async fn test_partial_success_releases_next_stage() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![
        StageBuilder::new(1, 1)
            .command("h1", Role::Datanode)
            .command("h2", Role::Datanode)
            .success_factor(Role::Datanode, 0.5)
            .build(),
        StageBuilder::new(1, 2)
            .starting_at(ACTION_TIMEOUT_MS)
            .command("h1", Role::Tasktracker)
            .build(),
    ])
    .unwrap();
    h.db.update_host_role_status(1, 1, "h1", Role::Datanode, HostRoleStatus::Completed)
        .unwrap();
    h.db.update_host_role_status(1, 1, "h2", Role::Datanode, HostRoleStatus::Failed)
        .unwrap();

    let result = h.scheduler.do_work().await.unwrap();
    assert_eq!(
        result.outcome,
        TickOutcome::Waiting {
            request_id: 1,
            stage_id: 2
        }
    );
    assert!(!h.db.is_request_aborted(1));
}

#[tokio::test]
async fn test_all_successful_when_every_queued_role_meets_factor() {
    let h = SchedulerHarness::new();
    h.db.persist_actions(vec![StageBuilder::new(1, 1)
        .command("h1", Role::Datanode)
        .command("h2", Role::Datanode)
        .success_factor(Role::Datanode, 0.5)
        .build()])
        .unwrap();
    h.db.update_host_role_status(1, 1, "h1", Role::Datanode, HostRoleStatus::Completed)
        .unwrap();

    let result = h.scheduler.do_work().await.unwrap();
    assert_eq!(result.outcome, TickOutcome::AllSuccessful);
    assert_eq!(result.stages_evaluated, 1);
}
