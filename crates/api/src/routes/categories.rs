//! Route definitions for the `/categories` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET  /            -> list_categories (flat, path order)
/// POST /            -> add_category (category manager)
/// GET  /tree        -> category_tree (forest)
/// PUT  /{id}        -> rename_category (category manager)
/// POST /{id}/delete -> delete_category (category manager; body carries mode)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::add_category),
        )
        .route("/tree", get(categories::category_tree))
        .route("/{id}", put(categories::rename_category))
        .route("/{id}/delete", post(categories::delete_category))
}
