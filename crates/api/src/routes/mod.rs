pub mod auth;
pub mod categories;
pub mod health;
pub mod notes;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register              register (public)
/// /auth/login                 login (public)
/// /auth/logout                logout
/// /auth/me                    current user (requires auth)
///
/// /notes                      list, create
/// /notes/{id}                 get, update, delete
///
/// /categories                 list, create
/// /categories/tree            forest view
/// /categories/{id}            rename
/// /categories/{id}/delete     subtree delete (body carries mode)
///
/// /admin/users                list (admin only)
/// /admin/users/{id}           edit
/// /admin/users/{id}/delete    delete (body carries mode)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
        .nest("/categories", categories::router())
        .nest("/admin/users", users::router())
}
