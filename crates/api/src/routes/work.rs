//! Route definitions for the `/work` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::work;
use crate::state::AppState;

/// Routes mounted at `/work` (all require auth).
///
/// ```text
/// POST /start         -> start a new session
/// POST /update        -> apply break / continue / finish
/// GET  /check-active  -> active session lookup
/// GET  /list          -> history listing
/// GET  /stats         -> aggregate statistics
/// GET  /{id}          -> single record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(work::start))
        .route("/update", post(work::update))
        .route("/check-active", get(work::check_active))
        .route("/list", get(work::list))
        .route("/stats", get(work::stats))
        .route("/{id}", get(work::get_by_id))
}
