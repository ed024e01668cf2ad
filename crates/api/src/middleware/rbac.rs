//! Permission-level guards.
//!
//! Each extractor wraps [`CurrentUser`] and rejects requests whose
//! permission level does not meet the minimum. Use these in route handlers
//! to enforce authorization at the type level; an anonymous request fails
//! with 401 before the level is even checked.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use faqdesk_core::error::CoreError;
use faqdesk_core::levels::{LEVEL_ADMIN, LEVEL_CATEGORY_MANAGER, LEVEL_CONTRIBUTOR};

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

fn forbidden() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "You don't have permission to access this content.".into(),
    ))
}

/// Requires any authenticated user.
///
/// Functionally equivalent to [`CurrentUser`] but named explicitly for use
/// in route definitions where the intent "this route requires login" should
/// be self-documenting.
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires permission level 2 (contributor) or higher.
pub struct RequireContributor(pub CurrentUser);

impl FromRequestParts<AppState> for RequireContributor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.permission_level < LEVEL_CONTRIBUTOR {
            return Err(forbidden());
        }
        Ok(RequireContributor(user))
    }
}

/// Requires permission level 3 (category manager) or higher.
pub struct RequireCategoryManager(pub CurrentUser);

impl FromRequestParts<AppState> for RequireCategoryManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.permission_level < LEVEL_CATEGORY_MANAGER {
            return Err(forbidden());
        }
        Ok(RequireCategoryManager(user))
    }
}

/// Requires permission level 4 (admin).
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.permission_level < LEVEL_ADMIN {
            return Err(forbidden());
        }
        Ok(RequireAdmin(user))
    }
}
