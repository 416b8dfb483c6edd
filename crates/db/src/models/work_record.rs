//! Work record entity model and DTOs.
//!
//! The segment history rides on the record row as a JSONB column, keeping
//! the record a single document the way the client consumes it.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use tempo_core::segment::Segment;
use tempo_core::types::{DbId, DurationMs, Timestamp};

/// A row from the `work_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkRecord {
    pub id: DbId,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub is_finished: bool,
    /// Sum of all closed work segments, server-confirmed.
    pub total_work_ms: DurationMs,
    /// Sum of all closed break segments, server-confirmed.
    pub total_break_ms: DurationMs,
    pub technique: Option<String>,
    pub segments: Json<Vec<Segment>>,
}

/// List view of a record: everything except the segment payload, plus a
/// flag for whether any notes are attached.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkRecordSummary {
    pub id: DbId,
    pub created_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub is_finished: bool,
    pub total_work_ms: DurationMs,
    pub total_break_ms: DurationMs,
    pub technique: Option<String>,
    pub has_notes: bool,
}

/// Aggregate scalars for the stats view.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct WorkStatsRow {
    pub total_work_ms: DurationMs,
    pub total_break_ms: DurationMs,
    pub record_count: i64,
    /// Records created within the trailing seven days.
    pub recent_count: i64,
}

/// Per-day work sums feeding the busiest-day fold.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DailyWorkRow {
    pub day: chrono::NaiveDate,
    pub work_ms: DurationMs,
}
