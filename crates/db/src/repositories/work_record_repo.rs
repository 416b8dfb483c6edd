//! Repository for the `work_records` table.
//!
//! The segment history is stored as JSONB on the row and always overwritten
//! wholesale (last write wins); the `uq_work_records_owner_active` partial
//! unique index guarantees at most one unfinished record per owner.

use sqlx::types::Json;
use sqlx::PgPool;
use tempo_core::segment::Segment;
use tempo_core::types::{DbId, DurationMs, Timestamp};

use crate::models::work_record::{DailyWorkRow, WorkRecord, WorkRecordSummary, WorkStatsRow};

/// Column list for work_records queries.
const COLUMNS: &str = "id, owner_id, created_at, finished_at, is_finished, \
    total_work_ms, total_break_ms, technique, segments";

/// Provides CRUD operations for work records.
pub struct WorkRecordRepo;

impl WorkRecordRepo {
    /// Create a new unfinished record with the given opening segments.
    ///
    /// A concurrent second start for the same owner violates
    /// `uq_work_records_owner_active` instead of creating a duplicate.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        technique: Option<&str>,
        segments: &[Segment],
    ) -> Result<WorkRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_records (owner_id, technique, segments)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkRecord>(&query)
            .bind(owner_id)
            .bind(technique)
            .bind(Json(segments))
            .fetch_one(pool)
            .await
    }

    /// Find a record by ID, scoped to its owner.
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<WorkRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_records WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, WorkRecord>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the owner's unfinished record, if any.
    pub async fn find_active(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Option<WorkRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM work_records
             WHERE owner_id = $1 AND NOT is_finished"
        );
        sqlx::query_as::<_, WorkRecord>(&query)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite an unfinished record's segments, totals, and finish state.
    ///
    /// Returns `None` when no unfinished record matches, which the API maps
    /// to 404. The technique only changes when a value is supplied.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_segments(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        segments: &[Segment],
        total_work_ms: DurationMs,
        total_break_ms: DurationMs,
        is_finished: bool,
        finished_at: Option<Timestamp>,
        technique: Option<&str>,
    ) -> Result<Option<WorkRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE work_records SET
                segments = $3,
                total_work_ms = $4,
                total_break_ms = $5,
                is_finished = $6,
                finished_at = $7,
                technique = COALESCE($8, technique)
             WHERE id = $1 AND owner_id = $2 AND NOT is_finished
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkRecord>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(Json(segments))
            .bind(total_work_ms)
            .bind(total_break_ms)
            .bind(is_finished)
            .bind(finished_at)
            .bind(technique)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's records newest first, optionally bounded by creation
    /// date, with a `has_notes` flag per record.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        start_date: Option<Timestamp>,
        end_date: Option<Timestamp>,
    ) -> Result<Vec<WorkRecordSummary>, sqlx::Error> {
        let query = "SELECT r.id, r.created_at, r.finished_at, r.is_finished,
                r.total_work_ms, r.total_break_ms, r.technique,
                EXISTS(SELECT 1 FROM notes n WHERE n.work_record_id = r.id) AS has_notes
             FROM work_records r
             WHERE r.owner_id = $1
               AND ($2::timestamptz IS NULL OR r.created_at >= $2)
               AND ($3::timestamptz IS NULL OR r.created_at <= $3)
             ORDER BY r.created_at DESC";
        sqlx::query_as::<_, WorkRecordSummary>(query)
            .bind(owner_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(pool)
            .await
    }

    /// Aggregate totals over the owner's finished records. `recent_cutoff`
    /// bounds the trailing-window count (callers pass now minus seven days).
    pub async fn stats_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        recent_cutoff: Timestamp,
    ) -> Result<WorkStatsRow, sqlx::Error> {
        let query = "SELECT
                COALESCE(SUM(total_work_ms), 0)::BIGINT AS total_work_ms,
                COALESCE(SUM(total_break_ms), 0)::BIGINT AS total_break_ms,
                COUNT(*) AS record_count,
                COUNT(*) FILTER (WHERE created_at >= $2) AS recent_count
             FROM work_records
             WHERE owner_id = $1 AND is_finished";
        sqlx::query_as::<_, WorkStatsRow>(query)
            .bind(owner_id)
            .bind(recent_cutoff)
            .fetch_one(pool)
            .await
    }

    /// Per-UTC-day work sums over the owner's finished records.
    pub async fn daily_work_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<DailyWorkRow>, sqlx::Error> {
        let query = "SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
                COALESCE(SUM(total_work_ms), 0)::BIGINT AS work_ms
             FROM work_records
             WHERE owner_id = $1 AND is_finished
             GROUP BY day
             ORDER BY day";
        sqlx::query_as::<_, DailyWorkRow>(query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
