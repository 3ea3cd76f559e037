use super::*;
use crate::{
    error::StoreRejection,
    protocol::{decision_path, DecisionRequest},
};

#[test]
fn group_decodes_with_missing_optional_member_fields() {
    let raw = r#"{
        "id": 5,
        "members": [{"id": 1, "name": "A. Kumar"}, {"id": 2, "phone": "+911234"}],
        "score_summary": "name~0.92",
        "top_evidence": {"same_phone": true, "same_email": false}
    }"#;
    let group: Group = serde_json::from_str(raw).expect("decode group");

    assert_eq!(group.id, GroupId(5));
    assert_eq!(group.status, None);
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.members[0].phone, None);
    assert_eq!(group.members[1].phone.as_deref(), Some("+911234"));
    assert_eq!(group.top_evidence.flag("same_phone"), Some(true));
    assert_eq!(group.top_evidence.flag("same_email"), Some(false));
    assert_eq!(group.top_evidence.flag("same_name"), None);
}

#[test]
fn legacy_rejected_status_reads_as_kept_separate() {
    let group: Group =
        serde_json::from_str(r#"{"id": 9, "status": "rejected", "score_summary": null, "members": []}"#)
            .expect("decode group");
    assert_eq!(group.status, Some(GroupStatus::KeptSeparate));
}

#[test]
fn non_boolean_evidence_is_not_a_flag() {
    let group: Group = serde_json::from_str(
        r#"{"id": 1, "members": [], "top_evidence": {"same_phone": null, "score": 0.7}}"#,
    )
    .expect("decode group");
    assert_eq!(group.top_evidence.flag("same_phone"), None);
    assert_eq!(group.top_evidence.flag("score"), None);
    assert_eq!(group.top_evidence.names().collect::<Vec<_>>(), ["same_phone", "score"]);
}

#[test]
fn decision_kind_parses_wire_names_only() {
    assert_eq!("approve".parse::<DecisionKind>(), Ok(DecisionKind::Approve));
    assert_eq!(
        " keep_separate ".parse::<DecisionKind>(),
        Ok(DecisionKind::KeepSeparate)
    );
    assert_eq!("merge_into".parse::<DecisionKind>(), Ok(DecisionKind::MergeInto));
    assert!("merge".parse::<DecisionKind>().is_err());
    assert_eq!(
        DecisionKind::KeepSeparate.resulting_status(),
        GroupStatus::KeptSeparate
    );
}

#[test]
fn decision_request_always_carries_null_target() {
    let body = DecisionRequest {
        decision: DecisionKind::Approve,
        actor: "alice".into(),
        target_canonical_id: None,
    };
    let json = serde_json::to_value(&body).expect("encode");
    assert_eq!(
        json,
        serde_json::json!({"decision": "approve", "actor": "alice", "target_canonical_id": null})
    );
    assert_eq!(decision_path(GroupId(5)), "/groups/5/decision");
}

#[test]
fn rejection_detail_renders_strings_and_structures() {
    let plain = StoreRejection::parse(br#"{"detail": "group not found"}"#).expect("parse");
    assert_eq!(plain.detail_text().as_deref(), Some("group not found"));

    let structured = StoreRejection::parse(br#"{"detail": [{"loc": ["body"]}]}"#).expect("parse");
    assert_eq!(
        structured.detail_text().as_deref(),
        Some(r#"[{"loc":["body"]}]"#)
    );

    assert!(StoreRejection::parse(b"Internal Server Error").is_none());
}
