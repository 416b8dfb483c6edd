pub mod auth;
pub mod health;
pub mod notes;
pub mod work;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register          register (public)
/// /auth/login             login (public)
/// /auth/logout            logout
/// /auth/check             current user or null (public)
///
/// /work/start             start a session (POST, auth)
/// /work/update            break / continue / finish (POST, auth)
/// /work/check-active      active session lookup (GET, auth)
/// /work/list              history listing (GET, auth)
/// /work/stats             aggregate statistics (GET, auth)
/// /work/{id}              single record (GET, auth)
///
/// /notes                  list board (GET), replace board (POST) (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/work", work::router())
        .nest("/notes", notes::router())
}
