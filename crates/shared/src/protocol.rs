use serde::{Deserialize, Serialize};

use crate::domain::{CaseId, DecisionKind, GroupId};

pub const DEDUPE_RUN_PATH: &str = "/dedupe/run";
pub const GROUPS_PATH: &str = "/groups";
pub const AUDIT_EXPORT_PATH: &str = "/audit/export";
pub const AUDIT_EXPORT_FILE_NAME: &str = "audit_export.json";

pub fn decision_path(group_id: GroupId) -> String {
    format!("{GROUPS_PATH}/{}/decision", group_id.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListQuery {
    pub status: String,
}

/// Body of `POST /groups/{id}/decision`.
///
/// Every key is always present on the wire; `target_canonical_id` is `null`
/// unless the decision is `merge_into`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: DecisionKind,
    pub actor: String,
    pub target_canonical_id: Option<CaseId>,
}
