//! Handlers for the `/notes` resource.
//!
//! Browsing requires login; writing requires contributor level. A note is
//! edited or deleted only by its author or by a category manager and above.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use faqdesk_core::error::CoreError;
use faqdesk_core::levels::LEVEL_CATEGORY_MANAGER;
use faqdesk_core::types::DbId;
use faqdesk_db::models::note::{CreateNote, Note, NoteOverview, UpdateNote};
use faqdesk_db::repositories::{CategoryRepo, NoteRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{RequireAuth, RequireContributor};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notes`.
#[derive(Debug, Deserialize)]
pub struct ListNotesParams {
    pub category_id: Option<DbId>,
}

/// Request body for `POST /notes` and `PUT /notes/{id}`.
#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notes
///
/// List all notes in creation order, optionally filtered to one category.
pub async fn list_notes(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListNotesParams>,
) -> AppResult<Json<Vec<NoteOverview>>> {
    let notes = NoteRepo::list(&state.pool, params.category_id).await?;
    Ok(Json(notes))
}

/// GET /api/v1/notes/{id}
pub async fn get_note(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<NoteOverview>> {
    let note = NoteRepo::find_overview_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "note", id }))?;
    Ok(Json(note))
}

/// POST /api/v1/notes
///
/// Create a note authored by the requesting contributor.
pub async fn create_note(
    RequireContributor(user): RequireContributor,
    State(state): State<AppState>,
    Json(input): Json<NoteForm>,
) -> AppResult<(StatusCode, Json<Note>)> {
    let category_id = validate_note_form(&state, &input).await?;

    let note = NoteRepo::create(
        &state.pool,
        &CreateNote {
            title: input.title,
            content: input.content,
            author_id: user.id,
            category_id,
        },
    )
    .await?;

    tracing::info!(note_id = note.id, author_id = user.id, "Created note");
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/v1/notes/{id}
pub async fn update_note(
    RequireContributor(user): RequireContributor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NoteForm>,
) -> AppResult<Json<Note>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "note", id }))?;
    ensure_can_modify(&note, &user)?;

    let category_id = validate_note_form(&state, &input).await?;

    let updated = NoteRepo::update(
        &state.pool,
        id,
        &UpdateNote {
            title: input.title,
            content: input.content,
            category_id,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "note", id }))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/notes/{id}
pub async fn delete_note(
    RequireContributor(user): RequireContributor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "note", id }))?;
    ensure_can_modify(&note, &user)?;

    NoteRepo::delete(&state.pool, id).await?;
    tracing::info!(note_id = id, user_id = user.id, "Deleted note");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A note may be modified by its author, or by a category manager and above.
fn ensure_can_modify(note: &Note, user: &CurrentUser) -> Result<(), AppError> {
    if note.author_id != user.id && user.permission_level < LEVEL_CATEGORY_MANAGER {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only edit your own notes.".into(),
        )));
    }
    Ok(())
}

/// Shared validation for create and update: title present, category present
/// and existing. Returns the resolved category id.
async fn validate_note_form(state: &AppState, input: &NoteForm) -> Result<DbId, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title is required.".into(),
        )));
    }
    let category_id = input.category_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Category is required.".into()))
    })?;

    CategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "category",
            id: category_id,
        }))?;

    Ok(category_id)
}
