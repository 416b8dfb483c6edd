//! Guest-mode persistence: the full timer state as a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tempo_core::timer::{TimerAction, TimerState};

use crate::error::ClientError;
use crate::store::SessionStore;

/// Default file name for the guest session state.
pub const STATE_FILE_NAME: &str = "timer_state.json";

/// File-backed store for guest sessions.
///
/// Every change (transitions and ticks alike) rewrites the whole file, so
/// the state a reload sees is always a complete snapshot. A malformed file
/// is treated as no session rather than an error.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Store the state file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the state file as `timer_state.json` under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STATE_FILE_NAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for LocalStore {
    async fn load(&self) -> Result<Option<TimerState>, ClientError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<TimerState>(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed state file, starting fresh");
                Ok(None)
            }
        }
    }

    async fn dispatch(
        &self,
        state: &TimerState,
        action: TimerAction,
    ) -> Result<TimerState, ClientError> {
        let mut next = state.clone();
        next.apply(action, Utc::now())?;
        self.persist(&next).await?;
        Ok(next)
    }

    async fn persist(&self, state: &TimerState) -> Result<(), ClientError> {
        let json = serde_json::to_string(state).map_err(|e| {
            ClientError::Storage(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
