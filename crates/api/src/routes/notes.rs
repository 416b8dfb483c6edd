//! Route definitions for the `/notes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes` (all require auth).
///
/// ```text
/// GET  /?work_id=  -> list the record's note board
/// POST /?work_id=  -> replace the record's note board
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(notes::list_notes).post(notes::replace_notes))
}
