use super::*;
use std::path::PathBuf;

use chrono::Utc;
use review_core::{DecisionReceipt, ReviewError, StatusOutcome, StatusReport};
use shared::domain::{DecisionKind, Evidence};

use crate::controller::events::{
    decision_outcome_events, UiError, UiErrorCategory, UiErrorContext,
};

fn group(id: i64) -> Group {
    Group {
        id: GroupId(id),
        status: None,
        score_summary: Some("score=0.88".into()),
        members: Vec::new(),
        top_evidence: Evidence::default(),
    }
}

fn report(outcome: StatusOutcome, message: &str) -> StatusReport {
    StatusReport {
        outcome,
        message: message.into(),
        reported_at: Utc::now(),
    }
}

#[test]
fn groups_are_replaced_wholesale() {
    let mut state = ConsoleState::default();
    assert_eq!(
        state.apply(&UiEvent::GroupsReplaced(vec![group(1), group(2)])),
        Redraw::Groups
    );
    state.apply(&UiEvent::GroupsReplaced(vec![group(3)]));

    assert_eq!(state.groups.len(), 1);
    assert!(state.find_group(GroupId(3)).is_some());
    assert!(state.find_group(GroupId(1)).is_none());
}

#[test]
fn mode_tracks_session_runs() {
    let mut state = ConsoleState::default();
    state.apply(&UiEvent::ModeChanged(SessionMode::Running));
    assert!(state.is_running());
    state.apply(&UiEvent::ModeChanged(SessionMode::Idle));
    assert!(!state.is_running());
}

#[test]
fn resolved_decision_releases_pending_guard() {
    let mut state = ConsoleState::default();
    state.pending_decisions.insert(GroupId(5));
    state.apply(&UiEvent::DecisionResolved {
        group_id: GroupId(5),
    });
    assert!(state.pending_decisions.is_empty());
}

#[test]
fn only_successful_status_is_redrawn() {
    let mut state = ConsoleState::default();
    assert_eq!(
        state.apply(&UiEvent::Status(report(StatusOutcome::Success, "Saved"))),
        Redraw::StatusOnly
    );
    assert_eq!(state.status, "Saved");

    // Failures are shown through the matching error event instead.
    assert_eq!(
        state.apply(&UiEvent::Status(report(
            StatusOutcome::Failure,
            "Error: network failure"
        ))),
        Redraw::Nothing
    );
    assert_eq!(state.status, "Error: network failure");
}

#[test]
fn errors_and_exports_update_status_line() {
    let mut state = ConsoleState::default();
    let err = UiError::from_review_error(
        UiErrorContext::Decision,
        &ReviewError::invalid_input("merge_into requires a canonical case id"),
    );
    assert_eq!(err.category(), UiErrorCategory::Validation);
    assert_eq!(err.context(), UiErrorContext::Decision);
    state.apply(&UiEvent::Error(err));
    assert!(state.status.starts_with("decision failed:"));
    assert!(state.status.ends_with("(nothing was sent)"));

    state.apply(&UiEvent::AuditSaved(PathBuf::from("out/audit_export.json")));
    assert!(state.status.contains("out/audit_export.json"));
}

#[test]
fn store_rejections_are_labelled() {
    let err = UiError::from_review_error(
        UiErrorContext::Decision,
        &ReviewError::Rejected {
            status: 404,
            detail: Some("group not found".into()),
        },
    );
    assert_eq!(err.category(), UiErrorCategory::Rejected);
    assert_eq!(
        err.display_line(),
        "decision failed: store rejected request with status 404: group not found (rejected by the store)"
    );

    let transport = UiError::from_review_error(
        UiErrorContext::DedupRun,
        &ReviewError::Transport("connection refused".into()),
    );
    assert_eq!(transport.category(), UiErrorCategory::Transport);
    assert!(transport.message().contains("connection refused"));
}

fn apply_all(state: &mut ConsoleState, events: &[UiEvent]) -> Vec<Redraw> {
    events.iter().map(|event| state.apply(event)).collect()
}

#[test]
fn saved_decision_with_stale_list_is_shown_to_the_reviewer() {
    let mut state = ConsoleState::default();
    state.pending_decisions.insert(GroupId(5));

    // The session's own failure status arrives first and stays quiet.
    state.apply(&UiEvent::Status(report(
        StatusOutcome::Failure,
        "Saved, but refreshing suggested groups failed: network failure",
    )));

    let receipt = DecisionReceipt {
        group_id: GroupId(5),
        kind: DecisionKind::Approve,
        refreshed: false,
    };
    let redraws = apply_all(&mut state, &decision_outcome_events(GroupId(5), &Ok(receipt)));

    assert_eq!(redraws, [Redraw::StatusOnly, Redraw::Nothing]);
    assert_eq!(
        state.status,
        "refresh failed: approve on group #5 was saved, but the list could not be reloaded; type 'refresh' to retry"
    );
    assert!(state.pending_decisions.is_empty());
}

#[test]
fn refreshed_decision_only_releases_the_guard() {
    let mut state = ConsoleState::default();
    state.pending_decisions.insert(GroupId(8));
    state.apply(&UiEvent::Status(report(StatusOutcome::Success, "Saved")));

    let receipt = DecisionReceipt {
        group_id: GroupId(8),
        kind: DecisionKind::KeepSeparate,
        refreshed: true,
    };
    let events = decision_outcome_events(GroupId(8), &Ok(receipt));
    assert_eq!(events.len(), 1);
    assert_eq!(apply_all(&mut state, &events), [Redraw::Nothing]);
    assert_eq!(state.status, "Saved");
    assert!(state.pending_decisions.is_empty());
}

#[test]
fn failed_decision_reports_error_then_releases_the_guard() {
    let mut state = ConsoleState::default();
    state.pending_decisions.insert(GroupId(2));

    let result = Err(ReviewError::Rejected {
        status: 400,
        detail: Some("group already decided".into()),
    });
    let redraws = apply_all(&mut state, &decision_outcome_events(GroupId(2), &result));

    assert_eq!(redraws, [Redraw::StatusOnly, Redraw::Nothing]);
    assert!(state.status.starts_with("decision failed:"));
    assert!(state.status.contains("group already decided"));
    assert!(state.pending_decisions.is_empty());
}
