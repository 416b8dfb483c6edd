//! The client-side timer state machine.
//!
//! [`TimerState`] is the view model a session UI renders from: the current
//! mode, cumulative work/break milliseconds, and the segment history. It is
//! derived from a work record plus wall-clock time and advanced either by
//! [`TimerState::apply`] (a user action) or [`TimerState::tick`] (the
//! once-a-second live increment).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::{apply_transition, initial_segments, WorkAction};
use crate::segment::{Segment, SegmentKind};
use crate::types::{DbId, DurationMs, Timestamp};

/// Fixed live-tick increment. Live totals advance in whole-second steps
/// rather than being re-derived from the wall clock, so sub-tick drift is
/// accepted until the next transition or sync recomputes exact totals.
pub const TICK_MS: DurationMs = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    NotStarted,
    Working,
    OnBreak,
    Finished,
}

/// User-level actions the reducer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    StartWork,
    StartBreak,
    Finish,
}

/// Totals reconstructed from a segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTotals {
    pub work_ms: DurationMs,
    pub break_ms: DurationMs,
    /// Kind of the trailing open segment, if any. The UI keeps incrementing
    /// this total between syncs.
    pub live: Option<SegmentKind>,
}

/// Reconstruct cumulative totals from a segment list.
///
/// Closed segments contribute their exact duration; a trailing open segment
/// contributes `now - started_at` and is reported as live.
pub fn totals(segments: &[Segment], now: Timestamp) -> SegmentTotals {
    let mut out = SegmentTotals {
        work_ms: 0,
        break_ms: 0,
        live: None,
    };
    let last = segments.len().wrapping_sub(1);
    for (i, seg) in segments.iter().enumerate() {
        let dur = seg.duration_ms(now);
        match seg.kind {
            SegmentKind::Work => out.work_ms += dur,
            SegmentKind::Break => out.break_ms += dur,
        }
        if i == last && seg.is_open() {
            out.live = Some(seg.kind);
        }
    }
    out
}

/// Client-local session view model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub work_ms: DurationMs,
    pub break_ms: DurationMs,
    /// Start of the currently open segment, if one is running.
    pub last_started_at: Option<Timestamp>,
    pub segments: Vec<Segment>,
    /// Server record id; `None` for guest sessions.
    pub record_id: Option<DbId>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::initial()
    }
}

impl TimerState {
    /// The empty not-started state.
    pub fn initial() -> Self {
        Self {
            mode: TimerMode::NotStarted,
            work_ms: 0,
            break_ms: 0,
            last_started_at: None,
            segments: Vec::new(),
            record_id: None,
        }
    }

    /// Rebuild a state from stored segments (local storage or a fetched
    /// server record).
    pub fn rehydrate(
        record_id: Option<DbId>,
        segments: Vec<Segment>,
        is_finished: bool,
        now: Timestamp,
    ) -> Self {
        let t = totals(&segments, now);
        let mode = if is_finished {
            TimerMode::Finished
        } else {
            match t.live {
                Some(SegmentKind::Work) => TimerMode::Working,
                Some(SegmentKind::Break) => TimerMode::OnBreak,
                None if segments.is_empty() => TimerMode::NotStarted,
                // Unfinished but nothing open: the server closed the tail
                // without a follow-up segment, treat the record as done.
                None => TimerMode::Finished,
            }
        };
        let last_started_at = segments
            .last()
            .filter(|s| s.is_open())
            .map(|s| s.started_at);

        Self {
            mode,
            work_ms: t.work_ms,
            break_ms: t.break_ms,
            last_started_at,
            segments,
            record_id,
        }
    }

    /// Kind of the currently running segment, if any.
    pub fn live_kind(&self) -> Option<SegmentKind> {
        match self.mode {
            TimerMode::Working => Some(SegmentKind::Work),
            TimerMode::OnBreak => Some(SegmentKind::Break),
            _ => None,
        }
    }

    /// Whether the one-second ticker should be running.
    pub fn is_live(&self) -> bool {
        self.live_kind().is_some()
    }

    /// Apply a user action at `now`, transitioning the mode and segment
    /// list. Guarded actions fail with [`CoreError::Conflict`] and leave the
    /// state untouched.
    pub fn apply(&mut self, action: TimerAction, now: Timestamp) -> Result<(), CoreError> {
        match (action, self.mode) {
            (TimerAction::StartWork, TimerMode::NotStarted) => {
                self.segments = initial_segments(now);
                self.mode = TimerMode::Working;
            }
            (TimerAction::StartWork, TimerMode::OnBreak) => {
                apply_transition(&mut self.segments, WorkAction::Continue, now)?;
                self.mode = TimerMode::Working;
            }
            (TimerAction::StartBreak, TimerMode::Working) => {
                apply_transition(&mut self.segments, WorkAction::Break, now)?;
                self.mode = TimerMode::OnBreak;
            }
            (TimerAction::Finish, TimerMode::Working | TimerMode::OnBreak) => {
                apply_transition(&mut self.segments, WorkAction::Finish, now)?;
                self.mode = TimerMode::Finished;
            }
            (TimerAction::StartWork, _) => {
                return Err(CoreError::Conflict("a session is already active".into()));
            }
            (TimerAction::StartBreak, _) => {
                return Err(CoreError::Conflict(
                    "breaks can only start while working".into(),
                ));
            }
            (TimerAction::Finish, _) => {
                return Err(CoreError::Conflict("no active session to finish".into()));
            }
        }

        // Transitions land on exact totals; ticking resumes from here.
        let t = totals(&self.segments, now);
        self.work_ms = t.work_ms;
        self.break_ms = t.break_ms;
        self.last_started_at = self
            .segments
            .last()
            .filter(|s| s.is_open())
            .map(|s| s.started_at);
        Ok(())
    }

    /// Advance the live total by one fixed tick. No-op unless a segment is
    /// running.
    pub fn tick(&mut self) {
        match self.live_kind() {
            Some(SegmentKind::Work) => self.work_ms += TICK_MS,
            Some(SegmentKind::Break) => self.break_ms += TICK_MS,
            None => {}
        }
    }
}
