//! Handlers for the `/admin/users` resource (user management).
//!
//! All handlers require the admin level via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use faqdesk_core::disposition::NoteDisposition;
use faqdesk_core::error::CoreError;
use faqdesk_core::levels::{LEVEL_ADMIN, LEVEL_VIEWER};
use faqdesk_core::types::DbId;
use faqdesk_db::models::user::{UpdateUser, UserResponse};
use faqdesk_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}`.
///
/// Name and level are required; a missing or empty password leaves the
/// stored hash untouched.
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub username: Option<String>,
    pub permission_level: Option<i64>,
    pub password: Option<String>,
}

/// Request body for `POST /admin/users/{id}/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// List all users ordered by name.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// PUT /api/v1/admin/users/{id}
///
/// Edit a user's name and permission level; rehash the password only when a
/// new one is supplied. A password change revokes the user's sessions.
pub async fn edit_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EditUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let name = match input.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Username is required.".into(),
            )))
        }
    };
    let permission_level = input.permission_level.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Permission level is required.".into(),
        ))
    })?;
    if !(LEVEL_VIEWER..=LEVEL_ADMIN).contains(&permission_level) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Permission level must be between {LEVEL_VIEWER} and {LEVEL_ADMIN}."
        ))));
    }

    if let Some(existing) = UserRepo::find_by_name(&state.pool, &name).await? {
        if existing.id != id {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "User {name} is already registered."
            ))));
        }
    }

    let new_password = input.password.filter(|p| !p.is_empty());
    let password_hash = match &new_password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        ),
        None => None,
    };

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name,
            permission_level,
            password_hash,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    if new_password.is_some() {
        SessionRepo::delete_all_for_user(&state.pool, id).await?;
    }

    tracing::info!(user_id = id, "Edited user account");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/v1/admin/users/{id}/delete
///
/// Delete a user. Self-deletion is blocked; the target's notes go to the
/// lowest-id other admin (mode=keep) or are deleted (mode=delete).
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DeleteUserRequest>,
) -> AppResult<StatusCode> {
    if id == admin.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot delete yourself. Please use another admin account to delete this user."
                .into(),
        )));
    }

    let disposition: NoteDisposition = input
        .mode
        .as_deref()
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Please choose what to do with existing notes.".into(),
            ))
        })?
        .parse()
        .map_err(AppError::Core)?;

    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))?;

    // The acting admin always qualifies, so a fallback must exist.
    let fallback = UserRepo::find_fallback_admin(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal("no fallback admin available".into()))
        })?;

    let notes_affected =
        UserRepo::delete_with_notes(&state.pool, target.id, fallback.id, disposition).await?;

    tracing::info!(
        user_id = id,
        fallback_admin_id = fallback.id,
        notes_affected,
        acting_admin_id = admin.id,
        "Deleted user account"
    );
    Ok(StatusCode::NO_CONTENT)
}
