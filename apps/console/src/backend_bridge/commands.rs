//! Backend commands queued from the console to the backend worker.

use shared::domain::{DecisionKind, GroupId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadGroups,
    RunDedup,
    Decide {
        group_id: GroupId,
        kind: DecisionKind,
        target_input: Option<String>,
    },
    ExportAudit,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadGroups => "load_groups",
            BackendCommand::RunDedup => "run_dedup",
            BackendCommand::Decide { .. } => "decide",
            BackendCommand::ExportAudit => "export_audit",
        }
    }
}
