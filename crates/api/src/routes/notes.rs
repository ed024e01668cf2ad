//! Route definitions for the `/notes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /          -> list_notes (?category_id= filter)
/// POST   /          -> create_note (contributor)
/// GET    /{id}      -> get_note
/// PUT    /{id}      -> update_note (author or category manager)
/// DELETE /{id}      -> delete_note (author or category manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
}
