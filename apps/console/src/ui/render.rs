use review_core::{StatusOutcome, StatusReport};
use shared::domain::{Group, Record};

pub const PLACEHOLDER: &str = "—";
const TEXT_PREVIEW_CHARS: usize = 80;
const EVIDENCE_SIGNALS: [&str; 2] = ["same_phone", "same_email"];

pub const HELP: &str = "\
Commands:
  list                      show the current suggested groups
  refresh                   reload suggested groups from the store
  run                       run deduplication, then reload
  approve <group>           approve a group as duplicates
  keep <group>              keep a group's records separate
  merge <group> <case-id>   merge a group into an existing case
  export                    write the audit trail to audit_export.json
  quit                      leave the console";

fn field(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => PLACEHOLDER,
    }
}

fn text_preview(text: Option<&str>) -> String {
    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    flattened.chars().take(TEXT_PREVIEW_CHARS).collect()
}

fn render_member(member: &Record) -> String {
    format!(
        "  {:<8} {:<20} {:<16} {:<28} {:<20} {}",
        member.id.0,
        field(member.name.as_deref()),
        field(member.phone.as_deref()),
        field(member.email.as_deref()),
        field(member.timestamp.as_deref()),
        text_preview(member.text.as_deref()),
    )
}

fn render_evidence(group: &Group) -> String {
    let evidence = &group.top_evidence;
    let mut signals: Vec<String> = EVIDENCE_SIGNALS
        .iter()
        .map(|name| match evidence.flag(name) {
            Some(flag) => format!("{name}={flag}"),
            None => format!("{name}={PLACEHOLDER}"),
        })
        .collect();
    // Other boolean signals the engine reported, after the fixed pair.
    signals.extend(
        evidence
            .names()
            .filter(|name| !EVIDENCE_SIGNALS.contains(name))
            .filter_map(|name| evidence.flag(name).map(|flag| format!("{name}={flag}"))),
    );
    format!("  Evidence: {}", signals.join(" "))
}

pub fn render_group(group: &Group, pending: bool) -> String {
    let mut lines = Vec::with_capacity(group.members.len() + 4);
    let marker = if pending { "  [saving decision…]" } else { "" };
    lines.push(format!(
        "Group #{}  {}{marker}",
        group.id.0,
        field(group.score_summary.as_deref())
    ));
    lines.push(format!(
        "  {:<8} {:<20} {:<16} {:<28} {:<20} {}",
        "ID", "Name", "Phone", "Email", "Timestamp", "Text"
    ));
    lines.extend(group.members.iter().map(render_member));
    lines.push(render_evidence(group));
    lines.join("\n")
}

pub fn render_groups(groups: &[Group], is_pending: impl Fn(&Group) -> bool) -> String {
    if groups.is_empty() {
        return "No suggested groups. Run \"run\" to start deduplication.".to_string();
    }
    groups
        .iter()
        .map(|group| render_group(group, is_pending(group)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_status(report: &StatusReport) -> String {
    let tag = match report.outcome {
        StatusOutcome::Success => "ok",
        StatusOutcome::Failure => "error",
    };
    format!(
        "[{} {tag}] {}",
        report.reported_at.format("%H:%M:%S"),
        report.message
    )
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
