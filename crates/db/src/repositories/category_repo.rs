//! Repository for the `categories` table.
//!
//! Path arithmetic (sibling indices, parent prefixes) lives in
//! `faqdesk_core::tree`; this module only runs the queries the encoding
//! makes possible: prefix scans for subtrees, `ORDER BY tree` for
//! depth-first listing order.

use faqdesk_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::category::{Category, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, level, tree, subcategory_count";

/// Outcome of a subtree deletion.
#[derive(Debug, Clone, Copy)]
pub struct SubtreeRemoval {
    pub categories_removed: u64,
    pub notes_affected: u64,
}

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Find a category by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by name.
    pub async fn find_by_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by its exact tree path.
    pub async fn find_by_tree(
        pool: &SqlitePool,
        tree: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE tree = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(tree)
            .fetch_optional(pool)
            .await
    }

    /// List all categories in depth-first display order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY tree ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Highest tree path among top-level categories, if any exist.
    pub async fn max_top_level_tree(pool: &SqlitePool) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT tree FROM categories WHERE level = 0 ORDER BY tree DESC LIMIT 1",
        )
        .fetch_optional(pool)
        .await
    }

    /// Highest tree path among the immediate children of `parent_tree`.
    ///
    /// The `___` suffix pattern matches exactly one more path group.
    pub async fn max_child_tree(
        pool: &SqlitePool,
        parent_tree: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT tree FROM categories WHERE tree LIKE $1 ORDER BY tree DESC LIMIT 1")
            .bind(format!("{parent_tree}___"))
            .fetch_optional(pool)
            .await
    }

    /// Insert a category whose path was computed by the caller.
    ///
    /// When `parent_id` is given, the parent's cached `subcategory_count`
    /// is incremented in the same transaction.
    pub async fn insert(
        pool: &SqlitePool,
        input: &CreateCategory,
        parent_id: Option<DbId>,
    ) -> Result<Category, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO categories (name, level, tree)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(input.level)
            .bind(&input.tree)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(parent_id) = parent_id {
            sqlx::query(
                "UPDATE categories SET subcategory_count = subcategory_count + 1 WHERE id = $1",
            )
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(category)
    }

    /// Rename a category. Returns `None` if no row with the given `id` exists.
    pub async fn rename(
        pool: &SqlitePool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("UPDATE categories SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category and every descendant (path-prefix match), handling
    /// the notes they contain.
    ///
    /// Runs in a transaction:
    /// - notes under the subtree are reassigned to `reassign_to` when given,
    ///   or deleted when `None`;
    /// - the subtree's category rows are removed;
    /// - when `decrement_parent_tree` names a surviving parent, its cached
    ///   `subcategory_count` is decremented.
    pub async fn delete_subtree(
        pool: &SqlitePool,
        tree_prefix: &str,
        reassign_to: Option<DbId>,
        decrement_parent_tree: Option<&str>,
    ) -> Result<SubtreeRemoval, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let like_pattern = format!("{tree_prefix}%");

        let notes_affected = match reassign_to {
            Some(category_id) => {
                sqlx::query(
                    "UPDATE notes SET category_id = $2
                     WHERE category_id IN (SELECT id FROM categories WHERE tree LIKE $1)",
                )
                .bind(&like_pattern)
                .bind(category_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
            }
            None => {
                sqlx::query(
                    "DELETE FROM notes
                     WHERE category_id IN (SELECT id FROM categories WHERE tree LIKE $1)",
                )
                .bind(&like_pattern)
                .execute(&mut *tx)
                .await?
                .rows_affected()
            }
        };

        let categories_removed = sqlx::query("DELETE FROM categories WHERE tree LIKE $1")
            .bind(&like_pattern)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if let Some(parent_tree) = decrement_parent_tree {
            sqlx::query(
                "UPDATE categories SET subcategory_count = subcategory_count - 1 WHERE tree = $1",
            )
            .bind(parent_tree)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(SubtreeRemoval {
            categories_removed,
            notes_affected,
        })
    }
}
