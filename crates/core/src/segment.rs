//! Timestamped work/break segments.
//!
//! A segment is a contiguous span tagged [`SegmentKind::Work`] or
//! [`SegmentKind::Break`]. A record's segment list is append-only except for
//! closing the most recent open segment; at most one segment is open at a
//! time and it is always the last element.

use serde::{Deserialize, Serialize};

use crate::types::{DurationMs, Timestamp};

/// Whether a segment counts toward work time or break time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Work,
    Break,
}

/// A contiguous span within a work record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub started_at: Timestamp,
    /// `None` while the segment is still running.
    pub ended_at: Option<Timestamp>,
}

impl Segment {
    /// Open a new segment starting at `now`.
    pub fn open(kind: SegmentKind, now: Timestamp) -> Self {
        Self {
            kind,
            started_at: now,
            ended_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Close the segment at `now`. Closing an already-closed segment keeps
    /// its original end time.
    pub fn close(&mut self, now: Timestamp) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Duration in milliseconds, using `now` as the end for open segments.
    /// Clamped to zero so a clock skewed before `started_at` never produces
    /// a negative duration.
    pub fn duration_ms(&self, now: Timestamp) -> DurationMs {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).num_milliseconds().max(0)
    }
}
