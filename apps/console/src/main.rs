use std::{io::BufRead, path::PathBuf, thread};

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use tracing::{info, warn};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{ConsoleState, Redraw},
};
use ui::{
    input::{parse_line, ConsoleCommand},
    render::{render_groups, render_status, HELP},
};

const COMMAND_QUEUE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(
    name = "dedup-review",
    version,
    about = "Review console for candidate duplicate groups"
)]
struct Args {
    /// Base address of the dedup store (overrides review.toml and REVIEW_API_BASE)
    #[arg(long)]
    api_base: Option<String>,
    /// Reviewer identifier recorded with every decision
    #[arg(long)]
    actor: Option<String>,
    #[arg(long, default_value = "review.toml")]
    config: PathBuf,
    /// Directory that receives audit_export.json
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = config::load_settings(&args.config)?.with_overrides(
        args.api_base,
        args.actor,
        args.export_dir,
    )?;
    info!(api_base = %settings.api_base, actor = %settings.actor, "starting review console");

    let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
    let (ui_tx, ui_rx) = unbounded();
    let backend = backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);
    let line_rx = spawn_stdin_reader();

    let mut state = ConsoleState::default();
    println!("{HELP}");

    loop {
        select! {
            recv(ui_rx) -> event => match event {
                Ok(event) => on_ui_event(&mut state, event),
                Err(_) => {
                    warn!("backend worker stopped");
                    break;
                }
            },
            recv(line_rx) -> line => match line {
                Ok(line) => {
                    if !on_line(&cmd_tx, &mut state, &line) {
                        break;
                    }
                }
                Err(_) => break,
            },
        }
    }

    // Let queued and in-flight commands finish before leaving.
    drop(cmd_tx);
    for event in ui_rx.iter() {
        on_ui_event(&mut state, event);
    }
    let _ = backend.join();
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (line_tx, line_rx) = unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

/// Returns false when the reviewer asked to leave.
fn on_line(cmd_tx: &Sender<BackendCommand>, state: &mut ConsoleState, line: &str) -> bool {
    match parse_line(line) {
        Ok(ConsoleCommand::Empty) => {}
        Ok(ConsoleCommand::Help) => println!("{HELP}"),
        Ok(ConsoleCommand::List) => draw_groups(state),
        Ok(ConsoleCommand::Quit) => return false,
        Ok(ConsoleCommand::Backend(cmd)) => {
            if let BackendCommand::Decide { group_id, .. } = &cmd {
                if state.find_group(*group_id).is_none() {
                    println!(
                        "Group #{} is not in the current view; the store decides whether it is still open",
                        group_id.0
                    );
                }
            }
            if !dispatch_backend_command(cmd_tx, cmd, state) {
                println!("{}", state.status);
            }
        }
        Err(message) => println!("{message}"),
    }
    true
}

fn on_ui_event(state: &mut ConsoleState, event: UiEvent) {
    if let UiEvent::Error(err) = &event {
        warn!(category = ?err.category(), context = ?err.context(), "{}", err.message());
    }
    let status_report = match &event {
        UiEvent::Status(report) => Some(report.clone()),
        _ => None,
    };

    match state.apply(&event) {
        Redraw::Groups => draw_groups(state),
        Redraw::StatusOnly => match status_report {
            Some(report) => println!("{}", render_status(&report)),
            None => println!("{}", state.status),
        },
        Redraw::Nothing => {}
    }
}

fn draw_groups(state: &ConsoleState) {
    let rendered = render_groups(&state.groups, |group| {
        state.pending_decisions.contains(&group.id)
    });
    println!("{rendered}");
}
