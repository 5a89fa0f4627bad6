mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use async_trait::async_trait;
use common::{fields, test_app, test_app_over, Reply, TestApp};
use edufinance::{AppError, EntityDescriptor, EntityStore, ListQuery, MemoryStore, Record};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn home_and_user_pages() {
    let app = test_app();
    let home = app.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.text().contains("Hello James"));

    let user = app.get("/user/").await;
    assert_eq!(user.text(), "Hello from Class Based View in User");
}

#[tokio::test]
async fn post_form_creates_and_redirects_home() {
    let app = test_app();
    assert!(app.get("/post-form").await.text().contains("name=\"title\""));

    let submitted = app.form("/post-form", "title=T&body=B").await;
    assert_eq!(submitted.status, StatusCode::FOUND);
    assert_eq!(submitted.headers[header::LOCATION], "/");

    let posts = app.state.gateway.list("post", &ListQuery::all()).await.unwrap();
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post["title"], "T");
    assert_eq!(post["number_of_likes"], 0);
    assert_eq!(post["number_of_shares"], 0);
    assert_eq!(post["is_active"], true);
    assert_eq!(post["is_deleted"], false);
    assert_eq!(post["user"], serde_json::Value::Null);
}

#[tokio::test]
async fn invalid_post_form_is_rerendered_with_errors() {
    let app = test_app();
    let page = app.form("/post-form", "title=&body=kept+text").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(html.contains("This field is required."));
    assert!(!html.contains("may not be blank"));
    assert!(html.contains("kept text"));
    assert!(app.state.gateway.all("post").await.unwrap().is_empty());
}

#[tokio::test]
async fn post_form_ignores_fields_outside_the_form() {
    let app = test_app();
    app.form("/post-form", "title=T&body=B&number_of_likes=50&is_deleted=true").await;
    let post = &app.state.gateway.all("post").await.unwrap()[0];
    assert_eq!(post["number_of_likes"], 0);
    assert_eq!(post["is_deleted"], false);
}

async fn upload_post(app: &TestApp, title: &str) -> Reply {
    let body = format!(
        "--XX\r\n\
        Content-Disposition: form-data; name=\"title\"\r\n\r\n\
        {title}\r\n\
        --XX\r\n\
        Content-Disposition: form-data; name=\"body\"\r\n\r\n\
        B\r\n\
        --XX\r\n\
        Content-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\n\
        Content-Type: image/png\r\n\r\n\
        PNGDATA\r\n\
        --XX--\r\n"
    );
    app.send(
        Request::post("/post-form")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XX")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

/// Files left under the media root's `posts/` directory.
fn stored_posts(app: &TestApp) -> usize {
    match std::fs::read_dir(app.media.path().join("posts")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

/// Accepts everything except post inserts.
struct PostInsertFails(MemoryStore);

#[async_trait]
impl EntityStore for PostInsertFails {
    async fn insert(&self, entity: &EntityDescriptor, record: Record) -> Result<Record, AppError> {
        if entity.name == "post" {
            return Err(AppError::Store("disk full".into()));
        }
        self.0.insert(entity, record).await
    }

    async fn get(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError> {
        self.0.get(entity, id).await
    }

    async fn list(&self, entity: &EntityDescriptor, query: &ListQuery) -> Result<Vec<Record>, AppError> {
        self.0.list(entity, query).await
    }

    async fn update(&self, entity: &EntityDescriptor, id: i64, record: Record) -> Result<Option<Record>, AppError> {
        self.0.update(entity, id, record).await
    }

    async fn delete(&self, entity: &EntityDescriptor, id: i64) -> Result<Option<Record>, AppError> {
        self.0.delete(entity, id).await
    }
}

#[tokio::test]
async fn rejected_upload_form_leaves_no_file_behind() {
    let app = test_app();
    let long_title = "x".repeat(201);
    let page = upload_post(&app, &long_title).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("Ensure this field has no more than 200 characters."));
    assert!(app.state.gateway.all("post").await.unwrap().is_empty());
    assert_eq!(stored_posts(&app), 0);
}

#[tokio::test]
async fn store_failure_after_upload_removes_the_file() {
    let app = test_app_over(Arc::new(PostInsertFails(MemoryStore::new())));
    let reply = upload_post(&app, "Pic").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["error"]["code"], "store_error");
    assert_eq!(stored_posts(&app), 0);
}

#[tokio::test]
async fn multipart_upload_is_stored_and_served() {
    let app = test_app();
    let reply = upload_post(&app, "Pic").await;
    assert_eq!(reply.status, StatusCode::FOUND);

    let post = &app.state.gateway.all("post").await.unwrap()[0];
    let path = post["image"].as_str().unwrap().to_string();
    assert!(path.starts_with("posts/"));
    assert!(app.media.path().join(&path).exists());

    let api = app.get(&format!("/api/posts/{}/", post["id"])).await.json();
    assert_eq!(api["data"]["image"], format!("/media/{}", path));

    let served = app.get(&format!("/media/{}", path)).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.body, b"PNGDATA");
}

#[tokio::test]
async fn post_list_hides_deleted_but_detail_shows_them() {
    let app = test_app();
    let gw = &app.state.gateway;
    gw.create("post", fields(json!({"title": "Visible", "body": "B"}))).await.unwrap();
    let gone = gw.create("post", fields(json!({"title": "Gone", "body": "B"}))).await.unwrap();
    let gone_id = gone["id"].as_i64().unwrap();
    gw.delete("post", gone_id).await.unwrap();

    let list = app.get("/posts").await.text();
    assert!(list.contains("Visible"));
    assert!(!list.contains("Gone"));

    let detail = app.get(&format!("/posts/{}/", gone_id)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.text().contains("Gone"));

    assert_eq!(app.get("/posts/999/").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/posts/abc/").await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_reports_missing_fields_and_bad_credentials() {
    let app = test_app();
    app.user("alice", "pw").await;

    let empty = app.form("/login/", "username=&password=").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.text().matches("This field is required.").count(), 2);

    let wrong = app.form("/login/", "username=alice&password=nope").await;
    assert!(wrong.text().contains("Please enter a correct username and password."));

    let ok = app.form("/login/", "username=alice&password=pw").await;
    assert!(ok.text().contains("Welcome back, alice."));
}
