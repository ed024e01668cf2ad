//! Route definitions for the `/admin/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/admin/users`. All require the admin level.
///
/// ```text
/// GET  /            -> list_users
/// PUT  /{id}        -> edit_user
/// POST /{id}/delete -> delete_user (body carries mode)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/{id}", put(users::edit_user))
        .route("/{id}/delete", post(users::delete_user))
}
