use std::{
    fs,
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    domain::{DecisionKind, Group, GroupId, GroupStatus},
    protocol::{DecisionRequest, AUDIT_EXPORT_FILE_NAME},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

pub mod decision;
pub mod error;
pub mod transport;

pub use decision::DecisionDraft;
pub use error::{ErrorClass, ReviewError};
pub use transport::{HttpReviewStore, DEFAULT_API_BASE};

/// External store and dedup engine, as seen by a review session.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn run_dedup(&self) -> Result<(), ReviewError>;
    async fn list_groups(&self, status: GroupStatus) -> Result<Vec<Group>, ReviewError>;
    async fn submit_decision(
        &self,
        group_id: GroupId,
        request: &DecisionRequest,
    ) -> Result<(), ReviewError>;
    async fn export_audit(&self) -> Result<Vec<u8>, ReviewError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub outcome: StatusOutcome,
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

impl StatusReport {
    fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: StatusOutcome::Success,
            message: message.into(),
            reported_at: Utc::now(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: StatusOutcome::Failure,
            message: message.into(),
            reported_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == StatusOutcome::Success
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    GroupsReplaced(Vec<Group>),
    ModeChanged(SessionMode),
    Status(StatusReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    pub group_id: GroupId,
    pub kind: DecisionKind,
    /// False when the decision was stored but the follow-up reload failed.
    pub refreshed: bool,
}

/// Audit trail exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditExport {
    pub file_name: String,
    pub payload: Vec<u8>,
}

impl AuditExport {
    fn new(payload: Vec<u8>) -> Self {
        Self {
            file_name: AUDIT_EXPORT_FILE_NAME.to_string(),
            payload,
        }
    }

    pub fn write_into(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.payload)?;
        Ok(path)
    }
}

#[derive(Default)]
struct SessionState {
    groups: Vec<Group>,
    last_status: Option<StatusReport>,
}

/// One reviewer's view of the suggested groups.
///
/// The held set is a cache: every successful load replaces it wholesale and
/// nothing ever patches it locally.
pub struct ReviewSession {
    store: Arc<dyn ReviewStore>,
    running: AtomicBool,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

/// Returns the session to `Idle` when a dedup pass resolves, however it resolves.
struct RunGuard<'a> {
    session: &'a ReviewSession,
}

impl<'a> RunGuard<'a> {
    fn acquire(session: &'a ReviewSession) -> Option<Self> {
        session
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let _ = session
            .events
            .send(SessionEvent::ModeChanged(SessionMode::Running));
        Some(Self { session })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.session.running.store(false, Ordering::Release);
        let _ = self
            .session
            .events
            .send(SessionEvent::ModeChanged(SessionMode::Idle));
    }
}

impl ReviewSession {
    pub fn new(store: Arc<dyn ReviewStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            store,
            running: AtomicBool::new(false),
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn over_http(store: HttpReviewStore) -> Arc<Self> {
        Self::new(Arc::new(store))
    }

    pub fn mode(&self) -> SessionMode {
        if self.running.load(Ordering::Acquire) {
            SessionMode::Running
        } else {
            SessionMode::Idle
        }
    }

    pub async fn groups(&self) -> Vec<Group> {
        self.inner.lock().await.groups.clone()
    }

    pub async fn last_status(&self) -> Option<StatusReport> {
        self.inner.lock().await.last_status.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn report(&self, status: StatusReport) {
        {
            let mut guard = self.inner.lock().await;
            guard.last_status = Some(status.clone());
        }
        let _ = self.events.send(SessionEvent::Status(status));
    }

    async fn report_failure(&self, err: &ReviewError) {
        self.report(StatusReport::failure(format!("Error: {err}")))
            .await;
    }

    /// Full resynchronization of the suggested set. On failure the held set
    /// is left exactly as it was.
    pub async fn load_suggested_groups(&self) -> Result<Vec<Group>, ReviewError> {
        let groups = match self.store.list_groups(GroupStatus::Suggested).await {
            Ok(groups) => groups,
            Err(err) => {
                warn!("failed to load suggested groups: {err}");
                self.report_failure(&err).await;
                return Err(err);
            }
        };

        {
            let mut guard = self.inner.lock().await;
            guard.groups = groups.clone();
        }
        info!(count = groups.len(), "suggested groups reloaded");
        let _ = self.events.send(SessionEvent::GroupsReplaced(groups.clone()));
        Ok(groups)
    }

    /// Triggers the engine, then reloads. Refused while a previous pass is
    /// still unresolved.
    pub async fn run_dedup_pass(&self) -> Result<Vec<Group>, ReviewError> {
        let Some(_guard) = RunGuard::acquire(self) else {
            warn!("dedup pass requested while one is already running");
            let err = ReviewError::RunInFlight;
            self.report_failure(&err).await;
            return Err(err);
        };

        info!("dedup pass started");
        if let Err(err) = self.store.run_dedup().await {
            error!("dedup pass failed: {err}");
            self.report_failure(&err).await;
            return Err(err);
        }

        let groups = self.load_suggested_groups().await?;
        self.report(StatusReport::success("Dedup complete")).await;
        Ok(groups)
    }

    /// Sends a validated decision and, on success, reloads the suggested set
    /// so the decided group drops out of view.
    ///
    /// Not idempotent: each call issues its own request and the store decides
    /// whether the transition is still legal.
    pub async fn submit_decision(
        &self,
        group_id: GroupId,
        draft: &DecisionDraft,
    ) -> Result<DecisionReceipt, ReviewError> {
        let request = draft.to_request();
        if let Err(err) = self.store.submit_decision(group_id, &request).await {
            warn!(
                group_id = group_id.0,
                decision = %request.decision,
                "decision submission failed: {err}"
            );
            self.report_failure(&err).await;
            return Err(err);
        }
        info!(
            group_id = group_id.0,
            decision = %request.decision,
            status = %request.decision.resulting_status(),
            actor = %request.actor,
            "decision recorded"
        );

        let refreshed = match self.load_suggested_groups().await {
            Ok(_) => {
                self.report(StatusReport::success("Saved")).await;
                true
            }
            Err(err) => {
                self.report(StatusReport::failure(format!(
                    "Saved, but refreshing suggested groups failed: {err}"
                )))
                .await;
                false
            }
        };

        Ok(DecisionReceipt {
            group_id,
            kind: request.decision,
            refreshed,
        })
    }

    /// Validates raw reviewer input and submits it. Invalid input fails
    /// closed: nothing is sent.
    pub async fn decide(
        &self,
        group_id: GroupId,
        kind: DecisionKind,
        actor: &str,
        target_input: Option<&str>,
    ) -> Result<DecisionReceipt, ReviewError> {
        let draft = match DecisionDraft::new(kind, actor, target_input) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(group_id = group_id.0, decision = %kind, "decision not sent: {err}");
                self.report_failure(&err).await;
                return Err(err);
            }
        };
        self.submit_decision(group_id, &draft).await
    }

    pub async fn export_audit(&self) -> Result<AuditExport, ReviewError> {
        match self.store.export_audit().await {
            Ok(payload) => {
                info!(bytes = payload.len(), "audit trail exported");
                self.report(StatusReport::success("Audit exported")).await;
                Ok(AuditExport::new(payload))
            }
            Err(err) => {
                warn!("audit export failed: {err}");
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
