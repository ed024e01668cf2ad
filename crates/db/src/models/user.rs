//! User entity model and DTOs.

use faqdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub password_hash: String,
    pub permission_level: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub permission_level: i64,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            permission_level: user.permission_level,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub password_hash: String,
    pub permission_level: i64,
}

/// DTO for an admin edit of an existing user.
///
/// Name and level are always required; the password hash is replaced only
/// when a new password was supplied.
#[derive(Debug)]
pub struct UpdateUser {
    pub name: String,
    pub permission_level: i64,
    pub password_hash: Option<String>,
}
