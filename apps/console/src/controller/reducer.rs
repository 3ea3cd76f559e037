//! Console state and how backend events fold into it.

use std::collections::BTreeSet;

use review_core::SessionMode;
use shared::domain::{Group, GroupId};

use crate::controller::events::UiEvent;

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub groups: Vec<Group>,
    pub mode: SessionMode,
    /// Groups with a decision queued or in flight; further decisions on them are held back.
    pub pending_decisions: BTreeSet<GroupId>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Groups,
    StatusOnly,
    Nothing,
}

impl ConsoleState {
    pub fn apply(&mut self, event: &UiEvent) -> Redraw {
        match event {
            UiEvent::GroupsReplaced(groups) => {
                self.groups = groups.clone();
                Redraw::Groups
            }
            UiEvent::ModeChanged(mode) => {
                self.mode = *mode;
                Redraw::Nothing
            }
            UiEvent::Status(report) => {
                self.status = report.message.clone();
                if report.is_success() {
                    Redraw::StatusOnly
                } else {
                    Redraw::Nothing
                }
            }
            UiEvent::DecisionResolved { group_id } => {
                self.pending_decisions.remove(group_id);
                Redraw::Nothing
            }
            UiEvent::AuditSaved(path) => {
                self.status = format!("Audit trail written to {}", path.display());
                Redraw::StatusOnly
            }
            UiEvent::Info(message) => {
                self.status = message.clone();
                Redraw::StatusOnly
            }
            UiEvent::Error(err) => {
                self.status = err.display_line();
                Redraw::StatusOnly
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.mode == SessionMode::Running
    }

    pub fn find_group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == group_id)
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
