//! Backend worker: owns the tokio runtime and the review session, runs queued
//! commands as independent tasks and forwards session events to the console.

use std::{path::PathBuf, sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use review_core::{HttpReviewStore, ReviewSession, SessionEvent};
use tokio::sync::broadcast::error::RecvError;

use crate::{
    backend_bridge::commands::BackendCommand,
    config::Settings,
    controller::events::{decision_outcome_events, UiError, UiErrorContext, UiEvent},
};

struct Worker {
    session: Arc<ReviewSession>,
    actor: String,
    export_dir: PathBuf,
    ui_tx: Sender<UiEvent>,
}

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Settings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match HttpReviewStore::with_timeout(
                settings.api_base.clone(),
                settings.request_timeout,
            ) {
                Ok(store) => store,
                Err(err) => {
                    let _ = ui_tx.send(UiEvent::Error(UiError::from_review_error(
                        UiErrorContext::BackendStartup,
                        &err,
                    )));
                    tracing::error!("failed to build store client: {err}");
                    return;
                }
            };

            let worker = Arc::new(Worker {
                session: ReviewSession::over_http(store),
                actor: settings.actor,
                export_dir: settings.export_dir,
                ui_tx: ui_tx.clone(),
            });
            let forwarder = tokio::spawn(forward_session_events(
                worker.session.subscribe_events(),
                ui_tx.clone(),
            ));
            let _ = ui_tx.send(UiEvent::Info(format!(
                "Connected to {}",
                settings.api_base
            )));

            let mut tasks = vec![tokio::spawn(
                Arc::clone(&worker).handle(BackendCommand::LoadGroups),
            )];
            // Blocking recv runs on the block_on thread; commands run on workers.
            while let Ok(cmd) = cmd_rx.recv() {
                tasks.retain(|task| !task.is_finished());
                tasks.push(tokio::spawn(Arc::clone(&worker).handle(cmd)));
            }

            for task in tasks {
                let _ = task.await;
            }
            drop(worker);
            let _ = forwarder.await;
        });
    })
}

async fn forward_session_events(
    mut events: tokio::sync::broadcast::Receiver<SessionEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(SessionEvent::GroupsReplaced(groups)) => UiEvent::GroupsReplaced(groups),
            Ok(SessionEvent::ModeChanged(mode)) => UiEvent::ModeChanged(mode),
            Ok(SessionEvent::Status(report)) => UiEvent::Status(report),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "console fell behind session events");
                continue;
            }
            Err(RecvError::Closed) => return,
        };
        if ui_tx.send(event).is_err() {
            return;
        }
    }
}

impl Worker {
    async fn handle(self: Arc<Self>, cmd: BackendCommand) {
        match cmd {
            BackendCommand::LoadGroups => {
                if let Err(err) = self.session.load_suggested_groups().await {
                    self.fail(UiErrorContext::LoadGroups, &err);
                }
            }
            BackendCommand::RunDedup => {
                if let Err(err) = self.session.run_dedup_pass().await {
                    self.fail(UiErrorContext::DedupRun, &err);
                }
            }
            BackendCommand::Decide {
                group_id,
                kind,
                target_input,
            } => {
                let result = self
                    .session
                    .decide(group_id, kind, &self.actor, target_input.as_deref())
                    .await;
                for event in decision_outcome_events(group_id, &result) {
                    let _ = self.ui_tx.send(event);
                }
            }
            BackendCommand::ExportAudit => match self.session.export_audit().await {
                Ok(export) => match export.write_into(&self.export_dir) {
                    Ok(path) => {
                        tracing::info!(path = %path.display(), "audit trail saved");
                        let _ = self.ui_tx.send(UiEvent::AuditSaved(path));
                    }
                    Err(err) => {
                        let _ = self.ui_tx.send(UiEvent::Error(UiError::from_message(
                            UiErrorContext::Export,
                            format!(
                                "could not write {} into {}: {err}",
                                export.file_name,
                                self.export_dir.display()
                            ),
                        )));
                    }
                },
                Err(err) => self.fail(UiErrorContext::Export, &err),
            },
        }
    }

    fn fail(&self, context: UiErrorContext, err: &review_core::ReviewError) {
        let _ = self
            .ui_tx
            .send(UiEvent::Error(UiError::from_review_error(context, err)));
    }
}
