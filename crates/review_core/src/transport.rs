//! HTTP/JSON transport against the external store and dedup engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Group, GroupId, GroupStatus},
    error::StoreRejection,
    protocol::{
        decision_path, DecisionRequest, GroupListQuery, AUDIT_EXPORT_PATH, DEDUPE_RUN_PATH,
        GROUPS_PATH,
    },
};
use tracing::{debug, warn};

use crate::{error::ReviewError, ReviewStore};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

pub struct HttpReviewStore {
    http: Client,
    api_base: String,
}

impl HttpReviewStore {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    pub fn with_timeout(
        api_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ReviewError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ReviewError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(http, api_base))
    }

    pub fn with_client(http: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}

/// Maps any non-2xx response onto `ReviewError::Rejected`, keeping the
/// store's `detail` text when the body carries one.
async fn ensure_success(response: Response) -> Result<Response, ReviewError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let detail = StoreRejection::parse(&body).and_then(|rejection| rejection.detail_text());
    Err(ReviewError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl ReviewStore for HttpReviewStore {
    async fn run_dedup(&self) -> Result<(), ReviewError> {
        let response = self.http.post(self.url(DEDUPE_RUN_PATH)).send().await?;
        ensure_success(response).await?;
        debug!(api_base = %self.api_base, "dedup run accepted");
        Ok(())
    }

    async fn list_groups(&self, status: GroupStatus) -> Result<Vec<Group>, ReviewError> {
        let response = self
            .http
            .get(self.url(GROUPS_PATH))
            .query(&GroupListQuery {
                status: status.as_str().to_string(),
            })
            .send()
            .await?;
        let body = ensure_success(response).await?.bytes().await?;
        let groups: Vec<Group> = serde_json::from_slice(&body)
            .map_err(|err| ReviewError::MalformedResponse(err.to_string()))?;

        for group in &groups {
            if let Some(actual) = group.status.filter(|actual| *actual != status) {
                warn!(
                    group_id = group.id.0,
                    requested = %status,
                    %actual,
                    "store listed a group outside the requested status"
                );
            }
        }
        Ok(groups)
    }

    async fn submit_decision(
        &self,
        group_id: GroupId,
        request: &DecisionRequest,
    ) -> Result<(), ReviewError> {
        let response = self
            .http
            .post(self.url(&decision_path(group_id)))
            .json(request)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn export_audit(&self) -> Result<Vec<u8>, ReviewError> {
        let response = self.http.get(self.url(AUDIT_EXPORT_PATH)).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
