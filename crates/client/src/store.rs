//! The persistence port between the session host and its backing state.

use async_trait::async_trait;
use tempo_core::timer::{TimerAction, TimerState};

use crate::error::ClientError;

/// Where a session lives and how actions are applied to it.
///
/// [`LocalStore`](crate::local::LocalStore) computes transitions with the
/// core reducer and persists to a JSON file; [`RemoteStore`](crate::remote::RemoteStore)
/// maps each action to one HTTP call and lets the server close segment
/// boundaries with its own clock. The host drives either through this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Restore the persisted session, if any. Implementations recover from
    /// unreadable state by returning `Ok(None)` rather than failing startup.
    async fn load(&self) -> Result<Option<TimerState>, ClientError>;

    /// Apply a user action to `state` and persist the result, returning the
    /// new state. The caller swaps the returned state in on success; on
    /// error the previous state stays in place.
    async fn dispatch(
        &self,
        state: &TimerState,
        action: TimerAction,
    ) -> Result<TimerState, ClientError>;

    /// Persist the current state as-is. Called by the ticker for stores
    /// that hold the canonical copy locally; remote stores treat this as a
    /// no-op because the server already owns the segments.
    async fn persist(&self, state: &TimerState) -> Result<(), ClientError>;

    /// Discard any persisted session.
    async fn clear(&self) -> Result<(), ClientError>;
}
