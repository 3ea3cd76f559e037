use super::*;
use crate::error::ErrorClass;

#[test]
fn merge_into_requires_target() {
    for input in [None, Some(""), Some("   ")] {
        let err = DecisionDraft::new(DecisionKind::MergeInto, "alice", input)
            .expect_err("missing target must fail");
        assert_eq!(err.class(), ErrorClass::InvalidInput, "input {input:?}");
    }
}

#[test]
fn merge_into_rejects_non_numeric_and_non_positive_targets() {
    for input in ["abc", "12abc", "0", "-4", "1.5"] {
        let err = DecisionDraft::new(DecisionKind::MergeInto, "alice", Some(input))
            .expect_err("bad target must fail");
        assert!(err.is_local(), "input {input}");
    }
}

#[test]
fn merge_into_parses_trimmed_target() {
    let draft =
        DecisionDraft::new(DecisionKind::MergeInto, "alice", Some(" 42 ")).expect("valid draft");
    assert_eq!(draft.target(), Some(CaseId(42)));
    assert_eq!(
        draft.to_request(),
        DecisionRequest {
            decision: DecisionKind::MergeInto,
            actor: "alice".into(),
            target_canonical_id: Some(CaseId(42)),
        }
    );
}

#[test]
fn non_merge_decisions_must_not_carry_target() {
    let err = DecisionDraft::new(DecisionKind::Approve, "alice", Some("7")).expect_err("target");
    assert!(err.to_string().contains("does not take"));

    let draft = DecisionDraft::new(DecisionKind::KeepSeparate, "alice", Some("")).expect("blank ok");
    assert_eq!(draft.target(), None);
}

#[test]
fn actor_must_be_non_empty() {
    let err = DecisionDraft::new(DecisionKind::Approve, "  ", None).expect_err("empty actor");
    assert!(err.to_string().contains("actor"));

    // Opaque identifier: only emptiness is checked, the text goes out unchanged.
    let draft = DecisionDraft::new(DecisionKind::Approve, " reviewer@i4c ", None).expect("actor");
    assert_eq!(draft.actor(), " reviewer@i4c ");
    assert_eq!(draft.to_request().actor, " reviewer@i4c ");
}

#[test]
fn unknown_kind_fails_closed() {
    let err = DecisionDraft::parse("delete", "alice", None).expect_err("unknown kind");
    assert_eq!(err.class(), ErrorClass::InvalidInput);

    let draft = DecisionDraft::parse("keep_separate", "alice", None).expect("known kind");
    assert_eq!(draft.kind(), DecisionKind::KeepSeparate);
}
