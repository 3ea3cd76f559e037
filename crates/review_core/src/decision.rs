//! Local validation for decisions before anything is sent to the store.

use shared::{
    domain::{CaseId, DecisionKind},
    protocol::DecisionRequest,
};

use crate::error::ReviewError;

/// A decision that passed local validation and may be sent as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionDraft {
    kind: DecisionKind,
    actor: String,
    target: Option<CaseId>,
}

impl DecisionDraft {
    /// Validates reviewer input. `target_input` is the raw text typed for the
    /// canonical case id and is only meaningful for `merge_into`.
    pub fn new(
        kind: DecisionKind,
        actor: &str,
        target_input: Option<&str>,
    ) -> Result<Self, ReviewError> {
        if actor.trim().is_empty() {
            return Err(ReviewError::invalid_input("actor must not be empty"));
        }

        let target_input = target_input.map(str::trim).filter(|raw| !raw.is_empty());
        let target = match (kind.requires_target(), target_input) {
            (true, Some(raw)) => Some(parse_canonical_id(raw)?),
            (true, None) => {
                return Err(ReviewError::invalid_input(
                    "merge_into requires a canonical case id",
                ))
            }
            (false, Some(_)) => {
                return Err(ReviewError::invalid_input(format!(
                    "{kind} does not take a canonical case id"
                )))
            }
            (false, None) => None,
        };

        Ok(Self {
            kind,
            actor: actor.to_string(),
            target,
        })
    }

    /// Parses the decision kind from its wire name as well.
    pub fn parse(
        kind: &str,
        actor: &str,
        target_input: Option<&str>,
    ) -> Result<Self, ReviewError> {
        let kind = kind
            .parse::<DecisionKind>()
            .map_err(|err| ReviewError::invalid_input(err.to_string()))?;
        Self::new(kind, actor, target_input)
    }

    pub fn kind(&self) -> DecisionKind {
        self.kind
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn target(&self) -> Option<CaseId> {
        self.target
    }

    pub fn to_request(&self) -> DecisionRequest {
        DecisionRequest {
            decision: self.kind,
            actor: self.actor.clone(),
            target_canonical_id: self.target,
        }
    }
}

fn parse_canonical_id(raw: &str) -> Result<CaseId, ReviewError> {
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(CaseId(value)),
        Ok(_) => Err(ReviewError::invalid_input(format!(
            "canonical case id must be positive, got {raw}"
        ))),
        Err(_) => Err(ReviewError::invalid_input(format!(
            "canonical case id must be a number, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
#[path = "tests/decision_tests.rs"]
mod tests;
