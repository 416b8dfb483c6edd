//! The session host: shared state plus the one-second ticker task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use tempo_core::timer::{TimerAction, TimerState, TICK_MS};

use crate::error::ClientError;
use crate::store::SessionStore;

/// Owns the live [`TimerState`] and keeps the ticker scoped to it.
///
/// `dispatch` serializes concurrent actions behind the state mutex: the
/// store transition runs, the new state is swapped in, and the ticker task
/// is started or cancelled so it only runs while a segment is open. There
/// is no request queue; a second dispatch simply waits for the first.
pub struct SessionHost {
    state: Arc<Mutex<TimerState>>,
    store: Arc<dyn SessionStore>,
    /// Cancellation scope for the whole host; the ticker runs on a child
    /// token so shutdown stops it too.
    shutdown: CancellationToken,
    ticker: Mutex<Option<CancellationToken>>,
}

impl SessionHost {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState::initial())),
            store,
            shutdown: CancellationToken::new(),
            ticker: Mutex::new(None),
        }
    }

    /// Restore the persisted session, if any, and start ticking when it is
    /// live. Call once at startup.
    pub async fn restore(&self) -> Result<(), ClientError> {
        if let Some(loaded) = self.store.load().await? {
            let live = loaded.is_live();
            *self.state.lock().await = loaded;
            self.sync_ticker(live).await;
        }
        Ok(())
    }

    /// Apply a user action through the store and swap in the result.
    pub async fn dispatch(&self, action: TimerAction) -> Result<TimerState, ClientError> {
        let mut state = self.state.lock().await;
        let next = self.store.dispatch(&state, action).await?;
        *state = next.clone();
        drop(state);

        self.sync_ticker(next.is_live()).await;
        Ok(next)
    }

    /// Current state snapshot.
    pub async fn snapshot(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    /// Handle to the shared state, for the sync coordinator.
    pub fn state_handle(&self) -> Arc<Mutex<TimerState>> {
        Arc::clone(&self.state)
    }

    /// Cancellation scope of this host. Child tokens die with it.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop the ticker and any tasks scoped to this host.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Start or cancel the ticker task to match whether a segment is open.
    async fn sync_ticker(&self, live: bool) {
        let mut ticker = self.ticker.lock().await;
        match (live, ticker.as_ref()) {
            (true, None) => {
                let token = self.shutdown.child_token();
                spawn_ticker(
                    Arc::clone(&self.state),
                    Arc::clone(&self.store),
                    token.clone(),
                );
                *ticker = Some(token);
            }
            (false, Some(token)) => {
                token.cancel();
                *ticker = None;
            }
            _ => {}
        }
    }
}

/// Run the fixed one-second tick loop until cancelled or the state stops
/// being live. Guest stores persist the state after every tick so a reload
/// never loses more than a second.
fn spawn_ticker(
    state: Arc<Mutex<TimerState>>,
    store: Arc<dyn SessionStore>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS as u64));
        // The first interval tick completes immediately; skip it so the
        // first increment lands a full second after the transition.
        interval.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let snapshot = {
                        let mut st = state.lock().await;
                        if !st.is_live() {
                            break;
                        }
                        st.tick();
                        st.clone()
                    };
                    if let Err(e) = store.persist(&snapshot).await {
                        tracing::warn!(error = %e, "Failed to persist tick");
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use tempo_core::timer::TimerMode;

    /// In-memory store applying the core reducer, counting persists.
    struct MockStore {
        persist_count: std::sync::atomic::AtomicUsize,
    }

    impl MockStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                persist_count: std::sync::atomic::AtomicUsize::new(0),
            })
        }

        fn persists(&self) -> usize {
            self.persist_count.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionStore for MockStore {
        async fn load(&self) -> Result<Option<TimerState>, ClientError> {
            Ok(None)
        }

        async fn dispatch(
            &self,
            state: &TimerState,
            action: TimerAction,
        ) -> Result<TimerState, ClientError> {
            let mut next = state.clone();
            next.apply(action, Utc::now())?;
            Ok(next)
        }

        async fn persist(&self, _state: &TimerState) -> Result<(), ClientError> {
            self.persist_count
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }

        async fn clear(&self) -> Result<(), ClientError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_runs_while_live() {
        let store = MockStore::new();
        let host = SessionHost::new(store.clone());

        host.dispatch(TimerAction::StartWork).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3_050)).await;

        let state = host.snapshot().await;
        assert_eq!(state.work_ms, 3 * TICK_MS);
        assert_eq!(store.persists(), 3, "each tick persists once");

        host.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_follows_mode() {
        let store = MockStore::new();
        let host = SessionHost::new(store.clone());

        host.dispatch(TimerAction::StartWork).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_050)).await;
        host.dispatch(TimerAction::StartBreak).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_050)).await;

        let state = host.snapshot().await;
        assert_eq!(state.mode, TimerMode::OnBreak);
        assert!(state.break_ms >= 2 * TICK_MS, "breaks tick too");

        host.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_on_finish() {
        let store = MockStore::new();
        let host = SessionHost::new(store.clone());

        host.dispatch(TimerAction::StartWork).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_050)).await;
        host.dispatch(TimerAction::Finish).await.unwrap();

        let frozen = host.snapshot().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = host.snapshot().await;
        assert_eq!(state.mode, TimerMode::Finished);
        assert_eq!(
            (state.work_ms, state.break_ms),
            (frozen.work_ms, frozen.break_ms),
            "no ticks after finish"
        );

        host.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_action_keeps_state() {
        let store = MockStore::new();
        let host = SessionHost::new(store);

        host.dispatch(TimerAction::StartWork).await.unwrap();
        let before = host.snapshot().await;

        let result = host.dispatch(TimerAction::StartWork).await;
        assert!(result.is_err(), "double start is rejected");
        assert_eq!(host.snapshot().await.segments, before.segments);

        host.shutdown();
    }
}
