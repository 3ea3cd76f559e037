use shared::domain::{DecisionKind, GroupId};

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Empty,
    Help,
    List,
    Quit,
    Backend(BackendCommand),
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ConsoleCommand::Empty);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => ConsoleCommand::Help,
        "list" | "ls" => ConsoleCommand::List,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        "refresh" | "load" => ConsoleCommand::Backend(BackendCommand::LoadGroups),
        "run" | "dedupe" => ConsoleCommand::Backend(BackendCommand::RunDedup),
        "export" => ConsoleCommand::Backend(BackendCommand::ExportAudit),
        "approve" => decide(DecisionKind::Approve, words.next())?,
        "keep" | "keep_separate" => decide(DecisionKind::KeepSeparate, words.next())?,
        "merge" | "merge_into" => {
            let group = words.next();
            let target_input = words.next().map(str::to_string);
            match decide(DecisionKind::MergeInto, group)? {
                ConsoleCommand::Backend(BackendCommand::Decide { group_id, kind, .. }) => {
                    ConsoleCommand::Backend(BackendCommand::Decide {
                        group_id,
                        kind,
                        target_input,
                    })
                }
                other => other,
            }
        }
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{extra}'"));
    }
    Ok(command)
}

fn decide(kind: DecisionKind, group: Option<&str>) -> Result<ConsoleCommand, String> {
    let raw = group.ok_or_else(|| format!("usage: {} <group-id>", verb_for(kind)))?;
    let group_id = raw
        .trim_start_matches('#')
        .parse::<i64>()
        .map_err(|_| format!("'{raw}' is not a group id"))?;
    Ok(ConsoleCommand::Backend(BackendCommand::Decide {
        group_id: GroupId(group_id),
        kind,
        target_input: None,
    }))
}

fn verb_for(kind: DecisionKind) -> &'static str {
    match kind {
        DecisionKind::Approve => "approve",
        DecisionKind::KeepSeparate => "keep",
        DecisionKind::MergeInto => "merge",
    }
}

#[cfg(test)]
#[path = "../tests/input_tests.rs"]
mod tests;
