//! Handlers for the `/work` resource.
//!
//! Work records are mutated exclusively through the shared transition code
//! in `tempo_core::record`, with the server's clock closing the previously
//! open segment. The client and server therefore never disagree on where a
//! segment boundary falls.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tempo_core::error::CoreError;
use tempo_core::record::{
    apply_transition, closed_totals, initial_segments, Technique, WorkAction,
};
use tempo_core::stats::{busiest_day, BusiestDay, DailyWork};
use tempo_core::types::{DbId, DurationMs, Timestamp};
use tempo_db::models::work_record::WorkRecord;
use tempo_db::repositories::WorkRecordRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Width of the "recent sessions" stats window in days.
const RECENT_WINDOW_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /work/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartWorkRequest {
    pub technique: Option<Technique>,
}

/// Request body for `POST /work/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkRequest {
    pub work_id: DbId,
    pub action: WorkAction,
    pub technique: Option<Technique>,
}

/// Query parameters for `GET /work/list`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Response body for `GET /work/check-active`.
#[derive(Debug, Serialize)]
pub struct CheckActiveResponse {
    pub has_active_session: bool,
    pub active_work: Option<WorkRecord>,
}

/// Response body for `GET /work/stats`.
#[derive(Debug, Serialize)]
pub struct WorkStats {
    pub total_work_ms: DurationMs,
    pub total_break_ms: DurationMs,
    pub record_count: i64,
    /// Sessions started within the trailing seven days.
    pub recent_count: i64,
    pub busiest_day: Option<BusiestDay>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /work/start
///
/// Create a new unfinished record with one open work segment. Rejected with
/// 409 when the owner already has an active session; a racing duplicate
/// start is caught by the `uq_work_records_owner_active` index instead.
pub async fn start(
    auth: AuthUser,
    State(state): State<AppState>,
    input: Option<Json<StartWorkRequest>>,
) -> AppResult<impl IntoResponse> {
    let input = input.map(|Json(body)| body).unwrap_or_default();

    // 1. Friendly pre-check; the unique index is the real invariant.
    if WorkRecordRepo::find_active(&state.pool, auth.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An active session already exists".into(),
        )));
    }

    // 2. Create the record with the server's clock.
    let now = Utc::now();
    let record = WorkRecordRepo::create(
        &state.pool,
        auth.user_id,
        input.technique.map(|t| t.as_str()),
        &initial_segments(now),
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        record_id = record.id,
        "Work session started"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /work/update
///
/// Apply `break`, `continue`, or `finish` to the caller's unfinished record.
/// The server closes the previously open segment at its own clock before
/// opening the next one, then persists the canonical segments and totals.
/// 404 when no matching unfinished record is owned by the caller.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateWorkRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Load the record, scoped to the caller.
    let record = WorkRecordRepo::find_by_id_for_owner(&state.pool, input.work_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "WorkRecord",
                id: input.work_id,
            })
        })?;

    // Updating a finished record is indistinguishable from a missing one.
    if record.is_finished {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkRecord",
            id: input.work_id,
        }));
    }

    // 2. Apply the transition with the server's clock.
    let now = Utc::now();
    let mut segments = record.segments.0;
    apply_transition(&mut segments, input.action, now)?;

    let (total_work_ms, total_break_ms) = closed_totals(&segments);
    let is_finished = input.action == WorkAction::Finish;
    let finished_at = is_finished.then_some(now);

    // 3. Persist wholesale (last write wins).
    let updated = WorkRecordRepo::update_segments(
        &state.pool,
        record.id,
        auth.user_id,
        &segments,
        total_work_ms,
        total_break_ms,
        is_finished,
        finished_at,
        input.technique.map(|t| t.as_str()),
    )
    .await?
    .ok_or_else(|| {
        // Lost a race against a concurrent finish.
        AppError::Core(CoreError::NotFound {
            entity: "WorkRecord",
            id: input.work_id,
        })
    })?;

    tracing::info!(
        user_id = auth.user_id,
        record_id = updated.id,
        action = ?input.action,
        "Work session updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// GET /work/check-active
///
/// Report whether the caller has an unfinished record, and return it.
pub async fn check_active(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let active = WorkRecordRepo::find_active(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: CheckActiveResponse {
            has_active_session: active.is_some(),
            active_work: active,
        },
    }))
}

/// GET /work/list?start_date=&end_date=
///
/// The caller's records newest first, optionally bounded by creation date,
/// each with a `has_notes` flag.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let records = WorkRecordRepo::list_for_owner(
        &state.pool,
        auth.user_id,
        params.start_date,
        params.end_date,
    )
    .await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /work/stats
///
/// Aggregate totals over the caller's finished records: cumulative
/// work/break time, session counts, and the busiest day.
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let now = Utc::now();
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);

    let row = WorkRecordRepo::stats_for_owner(&state.pool, auth.user_id, cutoff).await?;
    let daily: Vec<DailyWork> = WorkRecordRepo::daily_work_for_owner(&state.pool, auth.user_id)
        .await?
        .into_iter()
        .map(|d| DailyWork {
            day: d.day,
            work_ms: d.work_ms,
        })
        .collect();

    Ok(Json(DataResponse {
        data: WorkStats {
            total_work_ms: row.total_work_ms,
            total_break_ms: row.total_break_ms,
            record_count: row.record_count,
            recent_count: row.recent_count,
            busiest_day: busiest_day(&daily),
        },
    }))
}

/// GET /work/{id}
///
/// A single record if owned by the caller, else 404.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = WorkRecordRepo::find_by_id_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "WorkRecord",
                id,
            })
        })?;
    Ok(Json(DataResponse { data: record }))
}
