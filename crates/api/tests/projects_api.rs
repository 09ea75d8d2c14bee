//! Integration tests for project CRUD and font association.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_authed, get_authed, post_json, put_json, upload, OTHER_USER, TEST_USER,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_project(app: &common::TestApp, user: i64, name: &str) -> serde_json::Value {
    let response = post_json(app, "/api/v1/projects", user, json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn upload_font(app: &common::TestApp, user: i64, file_name: &str) -> i64 {
    let response = upload(app, user, file_name, b"wOFFdata").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_derives_a_url_safe_slug(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "My Site Fonts!").await;
    assert_eq!(project["slug"], "my-site-fonts");
    assert_eq!(project["owner_id"], TEST_USER);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_slug_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);

    create_project(&app, TEST_USER, "Landing Page").await;

    // Different punctuation, same slug -- even across users.
    let response = post_json(
        &app,
        "/api/v1/projects",
        OTHER_USER,
        json!({ "name": "landing page" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn name_without_alphanumerics_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(&app, "/api/v1/projects", TEST_USER, json!({ "name": "!!!" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rename_rederives_the_slug(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Old Name").await;
    let id = project["id"].as_i64().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{id}"),
        TEST_USER,
        json!({ "name": "New Name" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "new-name");

    // The previously published slug no longer resolves.
    let response = common::get(&app, "/projects/old-name/css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_without_name_keeps_the_slug(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Stable").await;
    let id = project["id"].as_i64().unwrap();

    let response = put_json(
        &app,
        &format!("/api/v1/projects/{id}"),
        TEST_USER,
        json!({ "description": "fonts for the docs site" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["slug"], "stable");
    assert_eq!(json["data"]["description"], "fonts for the docs site");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_project_includes_member_fonts(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Docs").await;
    let project_id = project["id"].as_i64().unwrap();
    let font_id = upload_font(&app, TEST_USER, "Inter.woff").await;

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/fonts"),
        TEST_USER,
        json!({ "font_id": font_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_authed(&app, &format!("/api/v1/projects/{project_id}"), TEST_USER).await;
    let json = body_json(response).await;
    let fonts = json["data"]["fonts"].as_array().unwrap();
    assert_eq!(fonts.len(), 1);
    assert_eq!(fonts[0]["id"].as_i64().unwrap(), font_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dissociate_clears_the_membership(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Docs").await;
    let project_id = project["id"].as_i64().unwrap();
    let font_id = upload_font(&app, TEST_USER, "Inter.woff").await;

    post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/fonts"),
        TEST_USER,
        json!({ "font_id": font_id }),
    )
    .await;

    let response = delete_authed(
        &app,
        &format!("/api/v1/projects/{project_id}/fonts/{font_id}"),
        TEST_USER,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["project_id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn associating_a_foreign_font_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Docs").await;
    let project_id = project["id"].as_i64().unwrap();
    let foreign_font = upload_font(&app, OTHER_USER, "theirs.woff").await;

    let response = post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/fonts"),
        TEST_USER,
        json!({ "font_id": foreign_font }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn foreign_projects_behave_as_missing(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Private").await;
    let id = project["id"].as_i64().unwrap();

    let response = get_authed(&app, &format!("/api/v1/projects/{id}"), OTHER_USER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_authed(&app, &format!("/api/v1/projects/{id}"), OTHER_USER).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_project_keeps_its_fonts(pool: PgPool) {
    let app = common::build_test_app(pool);

    let project = create_project(&app, TEST_USER, "Doomed").await;
    let project_id = project["id"].as_i64().unwrap();
    let font_id = upload_font(&app, TEST_USER, "survivor.woff").await;

    post_json(
        &app,
        &format!("/api/v1/projects/{project_id}/fonts"),
        TEST_USER,
        json!({ "font_id": font_id }),
    )
    .await;

    let response = delete_authed(&app, &format!("/api/v1/projects/{project_id}"), TEST_USER).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Font survives, dissociated, blob untouched.
    let response = get_authed(&app, "/api/v1/fonts", TEST_USER).await;
    let json = body_json(response).await;
    let fonts = json["data"].as_array().unwrap();
    assert_eq!(fonts.len(), 1);
    assert!(fonts[0]["project_id"].is_null());
    assert_eq!(app.store.len().await, 1);
}
