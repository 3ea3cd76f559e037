//! Command orchestration from console actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::{backend_bridge::commands::BackendCommand, controller::reducer::ConsoleState};

/// Queues a command unless a local guard refuses it. Returns whether it was queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    state: &mut ConsoleState,
) -> bool {
    match &cmd {
        BackendCommand::RunDedup if state.is_running() => {
            state.status = "Deduplication is already running; wait for it to finish".to_string();
            return false;
        }
        BackendCommand::Decide { group_id, .. } if state.pending_decisions.contains(group_id) => {
            state.status = format!(
                "A decision for group #{} is already being saved",
                group_id.0
            );
            return false;
        }
        _ => {}
    }

    let cmd_name = cmd.name();
    let decided_group = match &cmd {
        BackendCommand::Decide { group_id, .. } => Some(*group_id),
        _ => None,
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued console->backend command");
            if let Some(group_id) = decided_group {
                state.pending_decisions.insert(group_id);
            }
            true
        }
        Err(TrySendError::Full(_)) => {
            state.status = "Command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            state.status =
                "Backend worker disconnected (possible startup/runtime failure); restart the console"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
