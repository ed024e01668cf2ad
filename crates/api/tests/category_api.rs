//! HTTP-level integration tests for the category tree: path assignment,
//! tree display, renames, and subtree deletion with both note modes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, login_admin, login_as, post_json, put_json};
use sqlx::SqlitePool;

use faqdesk_db::repositories::NoteRepo;

/// Create a category through the API, returning its JSON.
async fn create_category(
    app: &axum::Router,
    cookie: &str,
    name: &str,
    parent_id: i64,
) -> serde_json::Value {
    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": name, "parent_id": parent_id }),
        Some(cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Create a note directly via the API for a category.
async fn create_note(app: &axum::Router, cookie: &str, title: &str, category_id: i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/notes",
        serde_json::json!({ "title": title, "content": "", "category_id": category_id }),
        Some(cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// The root category is seeded with the first top-level slot.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_root_category_is_seeded(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login_as(&app, &pool, "viewer", 1).await;

    let response = get(app, "/api/v1/categories", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let general = &json.as_array().unwrap()[0];
    assert_eq!(general["id"], 1);
    assert_eq!(general["name"], "General");
    assert_eq!(general["tree"], "000");
    assert_eq!(general["level"], 0);
}

/// New top-level and nested categories get the next free path slots:
/// "Tech" after the seeded root is "001"; its first child is "001000".
#[sqlx::test(migrations = "../db/migrations")]
async fn test_path_assignment(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    assert_eq!(tech["tree"], "001");
    assert_eq!(tech["level"], 0);

    let rust = create_category(&app, &admin, "Rust", tech["id"].as_i64().unwrap()).await;
    assert_eq!(rust["tree"], "001000");
    assert_eq!(rust["level"], 1);

    let axum = create_category(&app, &admin, "Axum", rust["id"].as_i64().unwrap()).await;
    assert_eq!(axum["tree"], "001000000");
    assert_eq!(axum["level"], 2);

    // Second child of Tech takes the next sibling slot.
    let python = create_category(&app, &admin, "Python", tech["id"].as_i64().unwrap()).await;
    assert_eq!(python["tree"], "001001");

    // The parent's cached child count follows along.
    let response = get(app, "/api/v1/categories", Some(&admin)).await;
    let json = body_json(response).await;
    let tech_row = json
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Tech")
        .unwrap();
    assert_eq!(tech_row["subcategory_count"], 2);
}

/// Every assigned path satisfies length == (level + 1) * 3 and has a
/// resolvable parent prefix.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_path_invariants_hold(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let a = create_category(&app, &admin, "A", 0).await;
    let b = create_category(&app, &admin, "B", a["id"].as_i64().unwrap()).await;
    create_category(&app, &admin, "C", b["id"].as_i64().unwrap()).await;
    create_category(&app, &admin, "D", 0).await;

    let response = get(app, "/api/v1/categories", Some(&admin)).await;
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();

    for row in rows {
        let tree = row["tree"].as_str().unwrap();
        let level = row["level"].as_i64().unwrap();
        assert_eq!(tree.len() as i64, (level + 1) * 3, "path width for {tree}");

        if level > 0 {
            let parent_prefix = &tree[..tree.len() - 3];
            assert!(
                rows.iter().any(|c| c["tree"] == parent_prefix),
                "parent prefix {parent_prefix} of {tree} should exist"
            );
        }
    }
}

/// Category mutations need category-manager level; browsing does not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_management_requires_level(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone()).await;
    let contributor = login_as(&app, &pool, "carol", 2).await;

    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "Tech", "parent_id": 0 }),
        Some(&contributor),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(app, "/api/v1/categories/tree", Some(&contributor)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Name and parent selection are required; duplicate names conflict.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_category_validation(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "", "parent_id": 0 }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "NoParent" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "General", "parent_id": 0 }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // An unknown parent is not a valid target.
    let response = post_json(
        app,
        "/api/v1/categories",
        serde_json::json!({ "name": "Orphan", "parent_id": 999 }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The tree endpoint nests subcategories under their parents.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_category_tree_nesting(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    create_category(&app, &admin, "Rust", tech["id"].as_i64().unwrap()).await;
    create_category(&app, &admin, "Python", tech["id"].as_i64().unwrap()).await;

    let response = get(app, "/api/v1/categories/tree", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let forest = json.as_array().unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0]["name"], "General");

    let tech_node = &forest[1];
    assert_eq!(tech_node["name"], "Tech");
    let subs = tech_node["subcategories"].as_array().unwrap();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0]["name"], "Rust");
    assert_eq!(subs[1]["name"], "Python");
}

/// Renames stick; a name owned by another category conflicts; renaming a
/// category to its current name is allowed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_rename_category(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    let id = tech["id"].as_i64().unwrap();

    let response = put_json(
        app.clone(),
        &format!("/api/v1/categories/{id}"),
        serde_json::json!({ "name": "Technology" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Technology");

    let response = put_json(
        app.clone(),
        &format!("/api/v1/categories/{id}"),
        serde_json::json!({ "name": "General" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json(
        app.clone(),
        &format!("/api/v1/categories/{id}"),
        serde_json::json!({ "name": "Technology" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        app,
        &format!("/api/v1/categories/{id}"),
        serde_json::json!({ "name": "" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The seeded root category can never be deleted, even by an admin.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_root_category_is_protected(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let response = post_json(
        app,
        "/api/v1/categories/1/delete",
        serde_json::json!({ "mode": "delete" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// mode=keep moves every note in the subtree to the effective parent and
/// preserves the system-wide note count.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_category_keep_reassigns_notes(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone()).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    let tech_id = tech["id"].as_i64().unwrap();
    let rust = create_category(&app, &admin, "Rust", tech_id).await;
    let rust_id = rust["id"].as_i64().unwrap();

    create_note(&app, &admin, "in tech", tech_id).await;
    create_note(&app, &admin, "in rust", rust_id).await;
    create_note(&app, &admin, "in general", 1).await;
    let before = NoteRepo::count(&pool).await.unwrap();

    // Tech is top-level, so its notes fall back to the root category.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/categories/{tech_id}/delete"),
        serde_json::json!({ "mode": "keep" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["categories_removed"], 2);
    assert_eq!(json["notes_affected"], 2);

    assert_eq!(NoteRepo::count(&pool).await.unwrap(), before);
    let in_general: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE category_id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(in_general, 3);

    // The subtree itself is gone.
    let response = get(app, "/api/v1/categories", Some(&admin)).await;
    let names: Vec<String> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["General"]);
}

/// mode=delete removes exactly the subtree's notes.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_category_delete_removes_notes(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone()).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    let tech_id = tech["id"].as_i64().unwrap();
    let rust = create_category(&app, &admin, "Rust", tech_id).await;
    let rust_id = rust["id"].as_i64().unwrap();

    create_note(&app, &admin, "in tech", tech_id).await;
    create_note(&app, &admin, "in rust", rust_id).await;
    create_note(&app, &admin, "survivor", 1).await;
    let before = NoteRepo::count(&pool).await.unwrap();

    let response = post_json(
        app,
        &format!("/api/v1/categories/{tech_id}/delete"),
        serde_json::json!({ "mode": "delete" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(NoteRepo::count(&pool).await.unwrap(), before - 2);
}

/// Deleting a nested category reassigns its notes to the real parent and
/// frees the parent's child slot for reuse.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_subcategory_updates_parent(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone()).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    let tech_id = tech["id"].as_i64().unwrap();
    let rust = create_category(&app, &admin, "Rust", tech_id).await;
    let rust_id = rust["id"].as_i64().unwrap();
    create_note(&app, &admin, "in rust", rust_id).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/categories/{rust_id}/delete"),
        serde_json::json!({ "mode": "keep" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The note moved to Tech, and Tech's child count dropped back to zero.
    let in_tech: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE category_id = $1")
        .bind(tech_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(in_tech, 1);

    let response = get(app.clone(), "/api/v1/categories", Some(&admin)).await;
    let json = body_json(response).await;
    let tech_row = json
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Tech")
        .unwrap()
        .clone();
    assert_eq!(tech_row["subcategory_count"], 0);

    // The freed slot is handed out again.
    let replacement = create_category(&app, &admin, "Go", tech_id).await;
    assert_eq!(replacement["tree"], "001000");
}

/// The mode choice is mandatory and restricted to keep/delete.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_category_mode_validation(pool: SqlitePool) {
    let app = common::build_test_app(pool).await;
    let admin = login_admin(&app).await;

    let tech = create_category(&app, &admin, "Tech", 0).await;
    let tech_id = tech["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/categories/{tech_id}/delete"),
        serde_json::json!({}),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        &format!("/api/v1/categories/{tech_id}/delete"),
        serde_json::json!({ "mode": "archive" }),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
