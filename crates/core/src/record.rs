//! Record-level segment transitions shared by the server and the guest path.
//!
//! The server closes the previously open segment with its own clock before
//! applying the requested transition; the guest reducer does the same with
//! the local clock. Both call [`apply_transition`] so client and server can
//! never disagree on how segment boundaries are computed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::segment::{Segment, SegmentKind};
use crate::types::{DurationMs, Timestamp};

/// Wire action applied to an existing unfinished record.
///
/// `Break` pauses a running work segment, `Continue` resumes work from a
/// break, `Finish` closes the record for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkAction {
    Break,
    Continue,
    Finish,
}

/// Time-management technique label a user can attach to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    Pomodoro,
    Timeboxing,
    Flowtime,
}

impl Technique {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::Pomodoro => "pomodoro",
            Technique::Timeboxing => "timeboxing",
            Technique::Flowtime => "flowtime",
        }
    }
}

/// The segment list a freshly started record carries: one open work segment.
pub fn initial_segments(now: Timestamp) -> Vec<Segment> {
    vec![Segment::open(SegmentKind::Work, now)]
}

/// Apply a transition to an unfinished record's segment list, closing the
/// open segment at `now` first.
///
/// Maintains the invariant that at most one segment is open and it is always
/// the last element. Invalid transitions (pausing while not working, resuming
/// while not on break) are rejected with [`CoreError::Conflict`].
pub fn apply_transition(
    segments: &mut Vec<Segment>,
    action: WorkAction,
    now: Timestamp,
) -> Result<(), CoreError> {
    let open_kind = segments
        .last()
        .filter(|s| s.is_open())
        .map(|s| s.kind);

    match action {
        WorkAction::Break => match open_kind {
            Some(SegmentKind::Work) => {
                if let Some(last) = segments.last_mut() {
                    last.close(now);
                }
                segments.push(Segment::open(SegmentKind::Break, now));
                Ok(())
            }
            _ => Err(CoreError::Conflict(
                "no running work segment to pause".into(),
            )),
        },
        WorkAction::Continue => match open_kind {
            Some(SegmentKind::Break) => {
                if let Some(last) = segments.last_mut() {
                    last.close(now);
                }
                segments.push(Segment::open(SegmentKind::Work, now));
                Ok(())
            }
            _ => Err(CoreError::Conflict(
                "no running break segment to resume".into(),
            )),
        },
        WorkAction::Finish => {
            if segments.is_empty() {
                return Err(CoreError::Conflict("record has no segments to finish".into()));
            }
            if let Some(last) = segments.last_mut() {
                last.close(now);
            }
            Ok(())
        }
    }
}

/// Sum the durations of all *closed* segments, grouped by kind.
///
/// This is what the server persists as the record's confirmed totals; the
/// live tail of an open segment is a client-side presentation concern.
pub fn closed_totals(segments: &[Segment]) -> (DurationMs, DurationMs) {
    let mut work_ms = 0;
    let mut break_ms = 0;
    for seg in segments {
        if let Some(ended_at) = seg.ended_at {
            let dur = (ended_at - seg.started_at).num_milliseconds().max(0);
            match seg.kind {
                SegmentKind::Work => work_ms += dur,
                SegmentKind::Break => break_ms += dur,
            }
        }
    }
    (work_ms, break_ms)
}
