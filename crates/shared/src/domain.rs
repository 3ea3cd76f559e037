use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(GroupId);
id_newtype!(RecordId);
id_newtype!(CaseId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Suggested,
    Approved,
    #[serde(alias = "rejected")]
    KeptSeparate,
    Merged,
}

impl GroupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupStatus::Suggested => "suggested",
            GroupStatus::Approved => "approved",
            GroupStatus::KeptSeparate => "kept_separate",
            GroupStatus::Merged => "merged",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Approve,
    KeepSeparate,
    MergeInto,
}

impl DecisionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionKind::Approve => "approve",
            DecisionKind::KeepSeparate => "keep_separate",
            DecisionKind::MergeInto => "merge_into",
        }
    }

    pub fn requires_target(self) -> bool {
        self == DecisionKind::MergeInto
    }

    /// Terminal status the store moves a group to when it accepts this decision.
    pub fn resulting_status(self) -> GroupStatus {
        match self {
            DecisionKind::Approve => GroupStatus::Approved,
            DecisionKind::KeepSeparate => GroupStatus::KeptSeparate,
            DecisionKind::MergeInto => GroupStatus::Merged,
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDecisionKind(pub String);

impl fmt::Display for UnknownDecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown decision kind '{}' (expected approve, keep_separate or merge_into)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDecisionKind {}

impl FromStr for DecisionKind {
    type Err = UnknownDecisionKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "approve" => Ok(DecisionKind::Approve),
            "keep_separate" => Ok(DecisionKind::KeepSeparate),
            "merge_into" => Ok(DecisionKind::MergeInto),
            other => Err(UnknownDecisionKind(other.to_string())),
        }
    }
}

/// A single ingested record. Read-only from the review console's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Named signals explaining why the engine grouped records together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(pub BTreeMap<String, serde_json::Value>);

impl Evidence {
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(serde_json::Value::as_bool)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GroupStatus>,
    #[serde(default)]
    pub score_summary: Option<String>,
    #[serde(default)]
    pub members: Vec<Record>,
    #[serde(default)]
    pub top_evidence: Evidence,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
