//! Repository for the `users` table.

use chrono::Utc;
use faqdesk_core::disposition::NoteDisposition;
use faqdesk_core::levels::LEVEL_ADMIN;
use faqdesk_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, password_hash, permission_level, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (name, password_hash, permission_level, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.password_hash)
            .bind(input.permission_level)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by name (case-sensitive).
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE name = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY name ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Apply an admin edit. The password hash is only replaced when the
    /// input carries a new one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = $2,
                permission_level = $3,
                password_hash = COALESCE($4, password_hash),
                updated_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.permission_level)
            .bind(&input.password_hash)
            .bind(Utc::now())
            .fetch_optional(pool)
            .await
    }

    /// Find the admin that inherits a deleted user's notes: the lowest-id
    /// admin other than `exclude_id`.
    pub async fn find_fallback_admin(
        pool: &SqlitePool,
        exclude_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE permission_level = $1 AND id != $2
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(LEVEL_ADMIN)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user together with their notes and sessions.
    ///
    /// Runs in a transaction: the user's notes are reassigned to
    /// `fallback_admin_id` (keep) or deleted (delete), their sessions are
    /// removed, then the row itself. Returns the number of notes affected.
    pub async fn delete_with_notes(
        pool: &SqlitePool,
        user_id: DbId,
        fallback_admin_id: DbId,
        disposition: NoteDisposition,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let notes_affected = match disposition {
            NoteDisposition::Keep => {
                sqlx::query("UPDATE notes SET author_id = $2 WHERE author_id = $1")
                    .bind(user_id)
                    .bind(fallback_admin_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
            }
            NoteDisposition::Delete => {
                sqlx::query("DELETE FROM notes WHERE author_id = $1")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected()
            }
        };

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(notes_affected)
    }
}
