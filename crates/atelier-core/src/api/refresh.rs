//! Background token revalidation, deduplicated across callers.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{header, Client};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::access::CredentialAccessor;

/// How a background refresh ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No token to refresh.
    Skipped,
    /// The server sent a replacement token and it was stored.
    Refreshed,
    /// The server answered without a replacement token.
    Unchanged,
    /// The call failed. Logged, never surfaced to the triggering request.
    Failed(String),
}

type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

/// At most one verification call in flight; concurrent triggers share its outcome.
pub struct RefreshTask {
    http: Client,
    verify_url: String,
    refresh_header: String,
    credentials: Arc<dyn CredentialAccessor>,
    pending: Mutex<Option<PendingRefresh>>,
}

impl RefreshTask {
    pub fn new(
        http: Client,
        verify_url: String,
        refresh_header: String,
        credentials: Arc<dyn CredentialAccessor>,
    ) -> Self {
        Self {
            http,
            verify_url,
            refresh_header,
            credentials,
            pending: Mutex::new(None),
        }
    }

    pub async fn is_pending(&self) -> bool {
        self.pending.lock().await.is_some()
    }

    /// Revalidate the current token, joining a refresh that is already running.
    pub async fn trigger(&self) -> RefreshOutcome {
        let refresh = {
            let mut pending = self.pending.lock().await;
            match pending.as_ref() {
                Some(running) => {
                    debug!("Joining in-flight token refresh");
                    running.clone()
                }
                None => {
                    let fut = verify(
                        self.http.clone(),
                        self.verify_url.clone(),
                        self.refresh_header.clone(),
                        self.credentials.clone(),
                    )
                    .boxed()
                    .shared();
                    *pending = Some(fut.clone());
                    fut
                }
            }
        };

        let outcome = refresh.clone().await;

        let mut pending = self.pending.lock().await;
        if pending.as_ref().is_some_and(|p| p.ptr_eq(&refresh)) {
            *pending = None;
        }
        outcome
    }
}

async fn verify(
    http: Client,
    verify_url: String,
    refresh_header: String,
    credentials: Arc<dyn CredentialAccessor>,
) -> RefreshOutcome {
    let Some(token) = credentials.token() else {
        return RefreshOutcome::Skipped;
    };

    let response = http
        .post(&verify_url)
        .header(header::CONTENT_TYPE, "application/json")
        .bearer_auth(&token)
        .send()
        .await;

    match response {
        Ok(response) => {
            let new_token = response
                .headers()
                .get(refresh_header.as_str())
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|t| !t.is_empty());
            match new_token {
                Some(new_token) => {
                    credentials.apply_refreshed_token(new_token);
                    info!("Token silently refreshed");
                    RefreshOutcome::Refreshed
                }
                None => {
                    debug!(status = %response.status(), "Verification returned no new token");
                    RefreshOutcome::Unchanged
                }
            }
        }
        Err(e) => {
            error!(error = %e, url = %verify_url, "Token refresh failed");
            RefreshOutcome::Failed(e.to_string())
        }
    }
}
