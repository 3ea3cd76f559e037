use super::*;
use crossbeam_channel::bounded;
use review_core::SessionMode;
use shared::domain::{DecisionKind, GroupId};

fn approve(group_id: i64) -> BackendCommand {
    BackendCommand::Decide {
        group_id: GroupId(group_id),
        kind: DecisionKind::Approve,
        target_input: None,
    }
}

#[test]
fn decision_marks_group_pending_and_blocks_double_submit() {
    let (cmd_tx, cmd_rx) = bounded(8);
    let mut state = ConsoleState::default();

    assert!(dispatch_backend_command(&cmd_tx, approve(5), &mut state));
    assert!(state.pending_decisions.contains(&GroupId(5)));

    assert!(!dispatch_backend_command(&cmd_tx, approve(5), &mut state));
    assert!(state.status.contains("#5"));
    assert!(dispatch_backend_command(&cmd_tx, approve(6), &mut state));

    let queued: Vec<_> = cmd_rx.try_iter().collect();
    assert_eq!(queued, vec![approve(5), approve(6)]);
}

#[test]
fn run_is_refused_while_running() {
    let (cmd_tx, cmd_rx) = bounded(8);
    let mut state = ConsoleState {
        mode: SessionMode::Running,
        ..ConsoleState::default()
    };

    assert!(!dispatch_backend_command(&cmd_tx, BackendCommand::RunDedup, &mut state));
    assert!(cmd_rx.try_recv().is_err());

    // Other actions still go through during a run.
    assert!(dispatch_backend_command(&cmd_tx, BackendCommand::LoadGroups, &mut state));
    assert_eq!(cmd_rx.try_recv().ok(), Some(BackendCommand::LoadGroups));
}

#[test]
fn full_queue_does_not_mark_pending() {
    let (cmd_tx, _cmd_rx) = bounded(1);
    let mut state = ConsoleState::default();
    assert!(dispatch_backend_command(&cmd_tx, BackendCommand::ExportAudit, &mut state));

    assert!(!dispatch_backend_command(&cmd_tx, approve(9), &mut state));
    assert!(!state.pending_decisions.contains(&GroupId(9)));
    assert!(state.status.contains("queue is full"));
}

#[test]
fn disconnected_backend_is_reported() {
    let (cmd_tx, cmd_rx) = bounded(1);
    drop(cmd_rx);
    let mut state = ConsoleState::default();

    assert!(!dispatch_backend_command(&cmd_tx, BackendCommand::LoadGroups, &mut state));
    assert!(state.status.contains("disconnected"));
}
