//! Handlers for the `/notes` resource.
//!
//! A record's sticky-note board is read and written wholesale: the client
//! always sends the full board and the server replaces it in one
//! transaction. Ownership is enforced by resolving the parent record
//! through the caller's identity first.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use tempo_core::error::CoreError;
use tempo_core::notes::{validate_board_size, validate_color_tag, validate_note_content};
use tempo_core::types::DbId;
use tempo_db::models::note::CreateNote;
use tempo_db::repositories::{NoteRepo, WorkRecordRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the notes endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct NotesParams {
    pub work_id: DbId,
}

/// GET /notes?work_id=
///
/// List the board for a record owned by the caller.
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotesParams>,
) -> AppResult<impl IntoResponse> {
    let record = require_owned_record(&state, params.work_id, auth.user_id).await?;
    let notes = NoteRepo::list_for_record(&state.pool, record).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /notes?work_id=
///
/// Replace the board for a record owned by the caller.
pub async fn replace_notes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotesParams>,
    Json(input): Json<Vec<CreateNote>>,
) -> AppResult<impl IntoResponse> {
    validate_board_size(input.len()).map_err(AppError::BadRequest)?;
    for note in &input {
        validate_note_content(&note.content).map_err(AppError::BadRequest)?;
        if let Some(ref tag) = note.color_tag {
            validate_color_tag(tag).map_err(AppError::BadRequest)?;
        }
    }

    let record = require_owned_record(&state, params.work_id, auth.user_id).await?;
    let notes = NoteRepo::replace_for_record(&state.pool, record, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        record_id = record,
        note_count = notes.len(),
        "Note board replaced"
    );

    Ok(Json(DataResponse { data: notes }))
}

/// Resolve a record id owned by `owner_id`, or 404.
async fn require_owned_record(
    state: &AppState,
    work_id: DbId,
    owner_id: DbId,
) -> AppResult<DbId> {
    WorkRecordRepo::find_by_id_for_owner(&state.pool, work_id, owner_id)
        .await?
        .map(|r| r.id)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "WorkRecord",
                id: work_id,
            })
        })
}
