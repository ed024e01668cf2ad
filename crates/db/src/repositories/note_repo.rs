//! Repository for the `notes` table.

use chrono::Utc;
use faqdesk_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::note::{CreateNote, Note, NoteOverview, UpdateNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, author_id, category_id, created_at, updated_at";

/// Joined column list for listings (author and category names resolved).
const OVERVIEW_COLUMNS: &str = "notes.id, notes.title, notes.content, \
                                notes.author_id, users.name AS author_name, \
                                notes.category_id, categories.name AS category_name, \
                                notes.created_at, notes.updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO notes (title, content, author_id, category_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a note by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a note with author and category names resolved.
    pub async fn find_overview_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<NoteOverview>, sqlx::Error> {
        let query = format!(
            "SELECT {OVERVIEW_COLUMNS} FROM notes
             JOIN users ON users.id = notes.author_id
             JOIN categories ON categories.id = notes.category_id
             WHERE notes.id = $1"
        );
        sqlx::query_as::<_, NoteOverview>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notes in creation order, optionally filtered to one category.
    pub async fn list(
        pool: &SqlitePool,
        category_id: Option<DbId>,
    ) -> Result<Vec<NoteOverview>, sqlx::Error> {
        match category_id {
            Some(category_id) => {
                let query = format!(
                    "SELECT {OVERVIEW_COLUMNS} FROM notes
                     JOIN users ON users.id = notes.author_id
                     JOIN categories ON categories.id = notes.category_id
                     WHERE notes.category_id = $1
                     ORDER BY notes.created_at ASC, notes.id ASC"
                );
                sqlx::query_as::<_, NoteOverview>(&query)
                    .bind(category_id)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {OVERVIEW_COLUMNS} FROM notes
                     JOIN users ON users.id = notes.author_id
                     JOIN categories ON categories.id = notes.category_id
                     ORDER BY notes.created_at ASC, notes.id ASC"
                );
                sqlx::query_as::<_, NoteOverview>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update a note's title, content, and category; bumps `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET title = $2, content = $3, category_id = $4, updated_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.category_id)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Delete a note. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of notes in the system.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await
    }
}
