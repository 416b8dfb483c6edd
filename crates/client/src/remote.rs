//! Authenticated persistence: each action maps to one tempo API call.
//!
//! The server closes the open segment with its own clock and returns the
//! canonical segment list, which is rebuilt into a [`TimerState`] here. The
//! client never computes authenticated segment boundaries itself, with one
//! exception: a finish that cannot reach the server falls back to the local
//! reducer so the session can always be closed from the user's point of
//! view.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tempo_core::record::{Technique, WorkAction};
use tempo_core::segment::Segment;
use tempo_core::timer::{TimerAction, TimerMode, TimerState};
use tempo_core::types::{DbId, DurationMs, Timestamp};

use crate::error::ClientError;
use crate::store::SessionStore;
use crate::sync::RecordFetch;

/// HTTP client for the tempo API's `/work` endpoints.
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
    /// Technique label sent with the next start, if any.
    technique: Option<Technique>,
}

/// The `{ "data": ... }` envelope every tempo API response uses.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The `{ "error": ... }` body returned on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A work record as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecord {
    pub id: DbId,
    pub segments: Vec<Segment>,
    pub is_finished: bool,
    pub total_work_ms: DurationMs,
    pub total_break_ms: DurationMs,
    pub finished_at: Option<Timestamp>,
}

/// Response payload of `GET /work/check-active`.
#[derive(Debug, Deserialize)]
struct CheckActiveBody {
    has_active_session: bool,
    active_work: Option<RemoteRecord>,
}

impl RemoteRecord {
    /// Rebuild the client view model from the server's canonical record.
    fn into_state(self) -> TimerState {
        TimerState::rehydrate(Some(self.id), self.segments, self.is_finished, Utc::now())
    }
}

impl RemoteStore {
    /// Create a store for the API at `base_url` (e.g. `http://host:3000/api/v1`)
    /// authenticating with the given bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            technique: None,
        }
    }

    /// Label the next started session with a technique.
    pub fn with_technique(mut self, technique: Technique) -> Self {
        self.technique = Some(technique);
        self
    }

    /// POST /work/start
    pub async fn start(&self) -> Result<RemoteRecord, ClientError> {
        let body = serde_json::json!({ "technique": self.technique });
        let response = self
            .client
            .post(format!("{}/work/start", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::parse_response::<Envelope<RemoteRecord>>(response)
            .await
            .map(|e| e.data)
    }

    /// POST /work/update
    pub async fn update(
        &self,
        work_id: DbId,
        action: WorkAction,
    ) -> Result<RemoteRecord, ClientError> {
        let body = serde_json::json!({ "work_id": work_id, "action": action });
        let response = self
            .client
            .post(format!("{}/work/update", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        Self::parse_response::<Envelope<RemoteRecord>>(response)
            .await
            .map(|e| e.data)
    }

    /// GET /work/check-active
    pub async fn check_active(&self) -> Result<Option<RemoteRecord>, ClientError> {
        let response = self
            .client
            .get(format!("{}/work/check-active", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body = Self::parse_response::<Envelope<CheckActiveBody>>(response)
            .await?
            .data;
        Ok(body.has_active_session.then_some(body.active_work).flatten())
    }

    /// GET /work/{id}
    pub async fn fetch(&self, work_id: DbId) -> Result<RemoteRecord, ClientError> {
        let response = self
            .client
            .get(format!("{}/work/{work_id}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse_response::<Envelope<RemoteRecord>>(response)
            .await
            .map(|e| e.data)
    }

    // ---- private helpers ----

    /// Parse a successful JSON response body, or map a non-2xx status to
    /// [`ClientError::Api`] with the server's error message.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// The record id of the state, required for anything but a fresh start.
    fn record_id(state: &TimerState) -> Result<DbId, ClientError> {
        state.record_id.ok_or_else(|| {
            ClientError::Core(tempo_core::error::CoreError::Conflict(
                "no server-side session to update".into(),
            ))
        })
    }
}

#[async_trait]
impl SessionStore for RemoteStore {
    async fn load(&self) -> Result<Option<TimerState>, ClientError> {
        let active = self.check_active().await?;
        Ok(active.map(RemoteRecord::into_state))
    }

    async fn dispatch(
        &self,
        state: &TimerState,
        action: TimerAction,
    ) -> Result<TimerState, ClientError> {
        let record = match (action, state.mode) {
            (TimerAction::StartWork, TimerMode::NotStarted) => self.start().await?,
            (TimerAction::StartWork, _) => {
                self.update(Self::record_id(state)?, WorkAction::Continue)
                    .await?
            }
            (TimerAction::StartBreak, _) => {
                self.update(Self::record_id(state)?, WorkAction::Break)
                    .await?
            }
            (TimerAction::Finish, _) => {
                match self.update(Self::record_id(state)?, WorkAction::Finish).await {
                    Ok(record) => record,
                    // The server is unreachable; close the session locally so
                    // the user is never stuck in a running state. The server
                    // copy stays open and wins on the next load.
                    Err(e) if e.is_transport() => {
                        tracing::warn!(error = %e, "Finish unreachable, closing locally");
                        let mut next = state.clone();
                        next.apply(TimerAction::Finish, Utc::now())?;
                        return Ok(next);
                    }
                    Err(e) => return Err(e),
                }
            }
        };
        Ok(record.into_state())
    }

    async fn persist(&self, _state: &TimerState) -> Result<(), ClientError> {
        // The server owns the canonical segments; ticks are display-only.
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        Ok(())
    }
}

#[async_trait]
impl RecordFetch for RemoteStore {
    async fn fetch_record(&self, work_id: DbId) -> Result<RemoteRecord, ClientError> {
        self.fetch(work_id).await
    }
}
