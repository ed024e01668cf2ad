//! Handlers for the `/categories` resource.
//!
//! Browsing requires login; every mutation requires category-manager level.
//! Path computation for new categories and the subtree selection for
//! deletion both ride on the materialized-path encoding in
//! `faqdesk_core::tree`.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use faqdesk_core::disposition::NoteDisposition;
use faqdesk_core::error::CoreError;
use faqdesk_core::seed::ROOT_CATEGORY_ID;
use faqdesk_core::tree::TreePath;
use faqdesk_core::types::DbId;
use faqdesk_db::models::category::{Category, CreateCategory};
use faqdesk_db::repositories::{CategoryRepo, SubtreeRemoval};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAuth, RequireCategoryManager};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /categories`.
///
/// `parent_id` is required; `0` is the explicit "top-level" choice.
#[derive(Debug, Deserialize)]
pub struct AddCategoryRequest {
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// Request body for `PUT /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct RenameCategoryRequest {
    pub name: String,
}

/// Request body for `POST /categories/{id}/delete`.
#[derive(Debug, Deserialize)]
pub struct DeleteCategoryRequest {
    pub mode: Option<String>,
}

/// Response body for a subtree deletion.
#[derive(Debug, Serialize)]
pub struct DeleteCategoryResponse {
    pub categories_removed: u64,
    pub notes_affected: u64,
}

/// A category with its children attached, for tree display.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<CategoryNode>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// Flat list in depth-first display order (path order).
pub async fn list_categories(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/v1/categories/tree
///
/// The category forest reconstructed from materialized paths.
pub async fn category_tree(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryNode>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let forest = build_category_tree(&categories)?;
    Ok(Json(forest))
}

/// POST /api/v1/categories
///
/// Create a category under `parent_id` (0 = top-level), assigning the next
/// free sibling slot in the materialized path.
pub async fn add_category(
    RequireCategoryManager(user): RequireCategoryManager,
    State(state): State<AppState>,
    Json(input): Json<AddCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name is required.".into(),
        )));
    }
    let parent_id = input.parent_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Please select one of the options.".into(),
        ))
    })?;

    if CategoryRepo::find_by_name(&state.pool, &input.name)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category named '{}' already exists.",
            input.name
        ))));
    }

    let (tree, level, parent) = if parent_id == 0 {
        // Top-level: one past the highest existing top-level slot.
        let tree = match CategoryRepo::max_top_level_tree(&state.pool).await? {
            Some(highest) => TreePath::parse(&highest)?.next_sibling()?,
            None => TreePath::root(0)?,
        };
        (tree, 0, None)
    } else {
        let parent = CategoryRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "category",
                id: parent_id,
            }))?;
        let parent_path = TreePath::parse(&parent.tree)?;

        // First child takes slot 0; otherwise one past the highest sibling.
        let index = if parent.subcategory_count == 0 {
            0
        } else {
            match CategoryRepo::max_child_tree(&state.pool, &parent.tree).await? {
                Some(highest) => TreePath::parse(&highest)?.last_index() + 1,
                None => 0,
            }
        };

        (parent_path.child(index)?, parent.level + 1, Some(parent.id))
    };

    let category = CategoryRepo::insert(
        &state.pool,
        &CreateCategory {
            name: input.name,
            level,
            tree: tree.to_string(),
        },
        parent,
    )
    .await?;

    tracing::info!(
        category_id = category.id,
        tree = %category.tree,
        user_id = user.id,
        "Created category"
    );
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/categories/{id}
///
/// Rename a category. Renaming to its own current name is allowed.
pub async fn rename_category(
    RequireCategoryManager(_user): RequireCategoryManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RenameCategoryRequest>,
) -> AppResult<Json<Category>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Name is required.".into(),
        )));
    }

    if let Some(existing) = CategoryRepo::find_by_name(&state.pool, &input.name).await? {
        if existing.id != id {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Category {} already exists.",
                input.name
            ))));
        }
    }

    let category = CategoryRepo::rename(&state.pool, id, &input.name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "category",
            id,
        }))?;
    Ok(Json(category))
}

/// POST /api/v1/categories/{id}/delete
///
/// Delete a category and all its descendants. Notes under the subtree are
/// reassigned to the effective parent (mode=keep) or deleted (mode=delete).
pub async fn delete_category(
    RequireCategoryManager(user): RequireCategoryManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DeleteCategoryRequest>,
) -> AppResult<Json<DeleteCategoryResponse>> {
    if id == ROOT_CATEGORY_ID {
        return Err(AppError::Core(CoreError::Forbidden(
            "This category cannot be deleted".into(),
        )));
    }

    let disposition: NoteDisposition = input
        .mode
        .as_deref()
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Please choose what to do with existing notes.".into(),
            ))
        })?
        .parse()
        .map_err(AppError::Core)?;

    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "category",
            id,
        }))?;

    // Notes from a deleted top-level category fall back to the root
    // category; otherwise to the real parent.
    let parent = if category.level == 0 {
        CategoryRepo::find_by_id(&state.pool, ROOT_CATEGORY_ID)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Integrity("root category is missing".into()))
            })?
    } else {
        let parent_path = TreePath::parse(&category.tree)?
            .parent()
            .ok_or_else(|| {
                AppError::Core(CoreError::Integrity(format!(
                    "category {} has level {} but a top-level path",
                    category.id, category.level
                )))
            })?;
        CategoryRepo::find_by_tree(&state.pool, parent_path.as_str())
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Integrity(format!(
                    "parent path {parent_path} of category {} does not exist",
                    category.id
                )))
            })?
    };

    let reassign_to = match disposition {
        NoteDisposition::Keep => Some(parent.id),
        NoteDisposition::Delete => None,
    };
    // Only a surviving real parent loses a child; the root fallback for
    // top-level deletes is not the path-parent.
    let decrement_parent = (category.level > 0).then_some(parent.tree.as_str());

    let removal: SubtreeRemoval = CategoryRepo::delete_subtree(
        &state.pool,
        &category.tree,
        reassign_to,
        decrement_parent,
    )
    .await?;

    tracing::info!(
        category_id = id,
        categories_removed = removal.categories_removed,
        notes_affected = removal.notes_affected,
        user_id = user.id,
        "Deleted category subtree"
    );
    Ok(Json(DeleteCategoryResponse {
        categories_removed: removal.categories_removed,
        notes_affected: removal.notes_affected,
    }))
}

// ---------------------------------------------------------------------------
// Tree assembly
// ---------------------------------------------------------------------------

/// Assemble the category forest from a flat path-ordered listing.
///
/// Every non-root category's parent path must be present in the input, or
/// the whole reconstruction fails -- a missing parent means the stored
/// encoding is corrupt.
pub fn build_category_tree(categories: &[Category]) -> Result<Vec<CategoryNode>, CoreError> {
    let mut children: HashMap<String, Vec<Category>> = HashMap::new();
    let mut roots: Vec<Category> = Vec::new();

    for category in categories {
        let path = TreePath::parse(&category.tree)?;
        match path.parent() {
            None => roots.push(category.clone()),
            Some(parent) => {
                if !categories.iter().any(|c| c.tree == parent.as_str()) {
                    return Err(CoreError::Integrity(format!(
                        "category {:?} has no parent at path {parent}",
                        category.name
                    )));
                }
                children
                    .entry(parent.to_string())
                    .or_default()
                    .push(category.clone());
            }
        }
    }

    roots.sort_by(|a, b| a.tree.cmp(&b.tree));
    Ok(roots.into_iter().map(|c| attach(c, &children)).collect())
}

fn attach(category: Category, children: &HashMap<String, Vec<Category>>) -> CategoryNode {
    let mut subcategories: Vec<Category> =
        children.get(&category.tree).cloned().unwrap_or_default();
    subcategories.sort_by(|a, b| a.tree.cmp(&b.tree));
    CategoryNode {
        category,
        subcategories: subcategories
            .into_iter()
            .map(|c| attach(c, children))
            .collect(),
    }
}
