//! Periodic reconciliation of the local state with the server's record.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tempo_core::timer::{TimerMode, TimerState};
use tempo_core::types::DbId;

use crate::error::ClientError;
use crate::remote::RemoteRecord;

/// Interval between scheduled sync passes.
pub const SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// The fetch seam the coordinator runs against, implemented by
/// [`RemoteStore`](crate::remote::RemoteStore).
#[async_trait]
pub trait RecordFetch: Send + Sync {
    async fn fetch_record(&self, work_id: DbId) -> Result<RemoteRecord, ClientError>;
}

/// Background task that keeps an authenticated session aligned with the
/// server.
///
/// Every 30 seconds, and whenever [`notify_visible`](Self::notify_visible)
/// fires (tab became visible, app resumed), the coordinator refetches the
/// record and overwrites the shared state with a fresh rehydration: the
/// server wins, and the ticker keeps incrementing from the new baseline. A
/// failed fetch is logged and skipped; the next pass is the only retry. The
/// task ends on its own once the record is finished.
pub struct SyncCoordinator {
    notify: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl SyncCoordinator {
    /// Spawn the sync loop over `state`, fetching through `fetcher`, until
    /// `cancel` fires or the record finishes.
    pub fn spawn(
        state: Arc<Mutex<TimerState>>,
        fetcher: Arc<dyn RecordFetch>,
        cancel: CancellationToken,
    ) -> Self {
        let notify = Arc::new(Notify::new());
        let trigger = Arc::clone(&notify);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SYNC_INTERVAL);
            // Consume the immediate first tick; the caller just loaded.
            interval.tick().await;

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                    () = trigger.notified() => {}
                }

                if sync_once(&state, fetcher.as_ref()).await {
                    break;
                }
            }
        });

        Self { notify, handle }
    }

    /// Trigger an immediate sync pass (visibility or resume events).
    pub fn notify_visible(&self) {
        self.notify.notify_one();
    }

    /// Whether the background task has ended.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Run one sync pass. Returns `true` when the coordinator should stop.
async fn sync_once(state: &Mutex<TimerState>, fetcher: &dyn RecordFetch) -> bool {
    let record_id = {
        let st = state.lock().await;
        if st.mode == TimerMode::Finished {
            return true;
        }
        st.record_id
    };
    // Guest sessions have nothing to reconcile.
    let Some(work_id) = record_id else {
        return false;
    };

    match fetcher.fetch_record(work_id).await {
        Ok(record) => {
            let fresh =
                TimerState::rehydrate(Some(record.id), record.segments, record.is_finished, Utc::now());
            let finished = fresh.mode == TimerMode::Finished;
            *state.lock().await = fresh;
            finished
        }
        Err(e) => {
            tracing::warn!(work_id, error = %e, "Sync fetch failed, keeping local state");
            false
        }
    }
}
