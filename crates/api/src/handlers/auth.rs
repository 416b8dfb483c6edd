//! Handlers for the `/auth` resource (register, login, logout, check).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tempo_core::error::CoreError;
use tempo_core::types::DbId;
use tempo_db::models::user::{CreateUser, User};
use tempo_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

/// Minimum username length.
const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
///
/// The token is also set as an HttpOnly cookie; the body copy exists for
/// non-browser clients that authenticate with a bearer header instead.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and `GET /auth/check`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Response body for `GET /auth/check`.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub user: Option<UserInfo>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and log it in immediately. Duplicate usernames or
/// emails surface as 409 through the unique-constraint classifier.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Validate the registration fields.
    let username = input.username.trim();
    if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        ))));
    }
    if !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "Email address is not valid".into(),
        )));
    }
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Hash the password and create the user.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email: input.email.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    // 3. Issue a token and set the auth cookie.
    let (token, cookie) = issue_token(&state.config, user.id)?;
    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Sets the auth cookie and returns
/// the token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Find the user. A missing user and a bad password produce the same
    //    message so usernames cannot be probed.
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    // 2. Verify the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    tracing::info!(user_id = user.id, "User logged in");

    // 3. Issue a token and set the auth cookie.
    let (token, cookie) = issue_token(&state.config, user.id)?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            token,
            user: UserInfo::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clear the auth cookie. Returns 204 No Content. Tokens are stateless, so
/// logout is purely a client-side capability drop.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = format!(
        "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax",
        state.config.auth_cookie_name
    );
    ([(SET_COOKIE, cookie)], StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/check
///
/// Report the authenticated user, or `{ "user": null }` for guests.
pub async fn check(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<CheckResponse>> {
    let user = match auth {
        Some(auth) => UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .map(|u| UserInfo::from(&u)),
        None => None,
    };
    Ok(Json(CheckResponse { user }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an access token and the matching Set-Cookie value.
fn issue_token(config: &ServerConfig, user_id: DbId) -> AppResult<(String, String)> {
    let token = generate_token(user_id, &config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let max_age = config.jwt.expiry_hours * 3600;
    let cookie = format!(
        "{}={token}; HttpOnly; Path=/; Max-Age={max_age}; SameSite=Lax",
        config.auth_cookie_name
    );
    Ok((token, cookie))
}
