//! Category entity model and DTOs.

use faqdesk_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table.
///
/// `tree` is the materialized path (`faqdesk_core::tree::TreePath` encoding);
/// `level` is redundant with `tree.len()` but kept denormalized for cheap
/// filtering of top-level categories. `subcategory_count` caches the number
/// of immediate children.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub level: i64,
    pub tree: String,
    pub subcategory_count: i64,
}

/// DTO for inserting a category whose path has already been computed.
#[derive(Debug)]
pub struct CreateCategory {
    pub name: String,
    pub level: i64,
    pub tree: String,
}
