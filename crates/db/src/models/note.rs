//! Note entity model and DTOs.

use faqdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Note row joined with its author and category names, for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NoteOverview {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    pub author_name: String,
    pub category_id: DbId,
    pub category_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note.
#[derive(Debug)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub author_id: DbId,
    pub category_id: DbId,
}

/// DTO for updating an existing note.
#[derive(Debug)]
pub struct UpdateNote {
    pub title: String,
    pub content: String,
    pub category_id: DbId,
}
