//! Console/backend events and error modeling for the review console.

use std::path::PathBuf;

use review_core::{DecisionReceipt, ErrorClass, ReviewError, SessionMode, StatusReport};
use shared::domain::{Group, GroupId};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    GroupsReplaced(Vec<Group>),
    ModeChanged(SessionMode),
    Status(StatusReport),
    DecisionResolved { group_id: GroupId },
    AuditSaved(PathBuf),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Rejected,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadGroups,
    DedupRun,
    Decision,
    Export,
}

impl UiErrorContext {
    fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "startup",
            UiErrorContext::LoadGroups => "refresh",
            UiErrorContext::DedupRun => "dedup run",
            UiErrorContext::Decision => "decision",
            UiErrorContext::Export => "audit export",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_review_error(context: UiErrorContext, err: &ReviewError) -> Self {
        let category = match err.class() {
            ErrorClass::Transport => UiErrorCategory::Transport,
            ErrorClass::Rejected => UiErrorCategory::Rejected,
            ErrorClass::InvalidInput => UiErrorCategory::Validation,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn display_line(&self) -> String {
        let hint = match self.category {
            UiErrorCategory::Transport => " (store unreachable; retry when it is back)",
            UiErrorCategory::Rejected => " (rejected by the store)",
            UiErrorCategory::Validation => " (nothing was sent)",
            UiErrorCategory::Unknown => "",
        };
        format!(
            "{} failed: {}{hint}",
            self.context.label(),
            self.message
        )
    }
}

/// Console events for a finished decision command. A decision that was saved
/// but left the list stale surfaces as a refresh error; the pending guard on the
/// group is always released last.
pub fn decision_outcome_events(
    group_id: GroupId,
    result: &Result<DecisionReceipt, ReviewError>,
) -> Vec<UiEvent> {
    let mut events = Vec::with_capacity(2);
    match result {
        Ok(receipt) if receipt.refreshed => {}
        Ok(receipt) => events.push(UiEvent::Error(UiError::from_message(
            UiErrorContext::LoadGroups,
            format!(
                "{} on group #{} was saved, but the list could not be reloaded; type 'refresh' to retry",
                receipt.kind, group_id.0
            ),
        ))),
        Err(err) => events.push(UiEvent::Error(UiError::from_review_error(
            UiErrorContext::Decision,
            err,
        ))),
    }
    events.push(UiEvent::DecisionResolved { group_id });
    events
}
