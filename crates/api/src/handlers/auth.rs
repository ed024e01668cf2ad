//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use faqdesk_core::error::CoreError;
use faqdesk_core::levels::LEVEL_VIEWER;
use faqdesk_core::types::DbId;
use faqdesk_db::models::session::CreateSession;
use faqdesk_db::models::user::{CreateUser, UserResponse};
use faqdesk_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{
    clear_session_cookie, generate_session_token, hash_session_token, session_cookie,
    session_token_from_headers,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Single message for every login failure. Deliberately does not say
/// whether the username or the password was wrong.
const BAD_CREDENTIALS: &str = "Incorrect username or password.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for `GET /auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: DbId,
    pub name: String,
    pub permission_level: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new viewer-level account. The duplicate-name pre-check is a UX
/// nicety; the unique index on `users.name` is what actually guards the
/// race, and either path surfaces 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username is required.".into(),
        )));
    }
    if input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Password is required.".into(),
        )));
    }

    if UserRepo::find_by_name(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "User {} is already registered.",
            input.username
        ))));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.username,
            password_hash: hashed,
            permission_level: LEVEL_VIEWER,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, name = %user.name, "Registered new user");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. On success creates a session row
/// and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_name(&state.pool, &input.username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(BAD_CREDENTIALS.into())));
    }

    let (token, token_hash) = generate_session_token();
    let ttl = chrono::Duration::hours(state.config.session_ttl_hours);
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash,
            expires_at: Utc::now() + ttl,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User logged in");
    let cookie = session_cookie(&token, ttl.num_seconds());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(&user)),
    ))
}

/// POST /api/v1/auth/logout
///
/// Remove the session row for the presented cookie (if any) and clear the
/// cookie. Safe to call when not logged in.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = session_token_from_headers(&headers) {
        SessionRepo::delete_by_token_hash(&state.pool, &hash_session_token(&token)).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    ))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's identity.
pub async fn me(user: CurrentUser) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        permission_level: user.permission_level,
    }))
}
