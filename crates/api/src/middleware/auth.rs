//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use faqdesk_core::error::CoreError;
use faqdesk_core::types::DbId;
use faqdesk_db::repositories::{SessionRepo, UserRepo};

use crate::auth::session::{hash_session_token, session_token_from_headers};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. Each request resolves the cookie token to a session row
/// and the session to a user -- explicit per-request context, no ambient
/// "current user" state.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's internal database id.
    pub id: DbId,
    /// The user's unique name.
    pub name: String,
    /// Permission level (1 viewer .. 4 admin).
    pub permission_level: i64,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Login required".into())))?;

        let token_hash = hash_session_token(&token);
        let session = SessionRepo::find_active_by_token_hash(&state.pool, &token_hash, Utc::now())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Session expired or invalid".into()))
            })?;

        let user = UserRepo::find_by_id(&state.pool, session.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            permission_level: user.permission_level,
        })
    }
}
