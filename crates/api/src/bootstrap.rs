//! Startup seeding.
//!
//! Creates the root "General" category and the default admin account when
//! absent, and purges expired sessions. An operational bootstrap, not
//! request logic -- runs once after migrations.

use chrono::Utc;
use faqdesk_core::levels::LEVEL_ADMIN;
use faqdesk_core::seed::{
    DEFAULT_ADMIN_ID, ROOT_CATEGORY_ID, ROOT_CATEGORY_NAME, ROOT_CATEGORY_TREE,
};
use faqdesk_db::repositories::{CategoryRepo, SessionRepo, UserRepo};
use faqdesk_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::ServerConfig;
use crate::error::AppError;

/// Seed the root category and default admin, purge expired sessions.
///
/// Idempotent: both rows are inserted with fixed ids and skipped when they
/// already exist.
pub async fn seed_defaults(pool: &DbPool, config: &ServerConfig) -> Result<(), AppError> {
    if CategoryRepo::find_by_id(pool, ROOT_CATEGORY_ID).await?.is_none() {
        sqlx::query(
            "INSERT INTO categories (id, name, level, tree, subcategory_count)
             VALUES ($1, $2, 0, $3, 0)",
        )
        .bind(ROOT_CATEGORY_ID)
        .bind(ROOT_CATEGORY_NAME)
        .bind(ROOT_CATEGORY_TREE)
        .execute(pool)
        .await?;
        tracing::info!(name = ROOT_CATEGORY_NAME, "Seeded root category");
    }

    if UserRepo::find_by_id(pool, DEFAULT_ADMIN_ID).await?.is_none() {
        let hashed = hash_password(&config.admin_password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO users (id, name, password_hash, permission_level, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(DEFAULT_ADMIN_ID)
        .bind(&config.admin_user)
        .bind(hashed)
        .bind(LEVEL_ADMIN)
        .bind(now)
        .execute(pool)
        .await?;
        tracing::info!(name = %config.admin_user, "Seeded default admin account");
    }

    let purged = SessionRepo::purge_expired(pool, Utc::now()).await?;
    if purged > 0 {
        tracing::info!(purged, "Purged expired sessions");
    }

    Ok(())
}
