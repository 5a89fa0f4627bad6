mod common;

use common::{fields, test_app};
use edufinance::{AppError, ListQuery};
use serde_json::{json, Value};

#[tokio::test]
async fn create_then_get_returns_the_same_record() {
    let app = test_app();
    let gw = &app.state.gateway;
    let created = gw.create("classroom", fields(json!({"name": "A"}))).await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(gw.get("classroom", id).await.unwrap(), created);
    assert!(matches!(gw.get("classroom", id + 1).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn filter_keeps_insertion_order() {
    let app = test_app();
    let gw = &app.state.gateway;
    for name in ["c", "a", "b", "d"] {
        gw.create("classroom", fields(json!({"name": name}))).await.unwrap();
    }
    let picked = gw
        .filter("classroom", |r| r["name"] != "a")
        .await
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(picked, vec!["c", "b", "d"]);

    let exact = gw.list("classroom", &ListQuery::by("name", json!("b"))).await.unwrap();
    assert_eq!(exact.len(), 1);
}

#[tokio::test]
async fn deleting_a_user_clears_post_authorship() {
    let app = test_app();
    let gw = &app.state.gateway;
    let user = app.user("alice", "pw").await;
    let uid = user["id"].clone();
    let post = gw
        .create("post", fields(json!({"title": "T", "body": "B", "user": uid})))
        .await
        .unwrap();
    let profile = gw
        .create("profile", fields(json!({"user": uid, "gender": "F", "role": "Admin"})))
        .await
        .unwrap();

    gw.delete("user", uid.as_i64().unwrap()).await.unwrap();

    let post = gw.get("post", post["id"].as_i64().unwrap()).await.unwrap();
    assert_eq!(post["user"], Value::Null);
    assert!(gw.get("profile", profile["id"].as_i64().unwrap()).await.is_err());
}

#[tokio::test]
async fn soft_delete_keeps_comments_purge_cascades() {
    let app = test_app();
    let gw = &app.state.gateway;
    let post = gw.create("post", fields(json!({"title": "T", "body": "B"}))).await.unwrap();
    let pid = post["id"].as_i64().unwrap();
    let comment = gw
        .create("comment", fields(json!({"post": pid, "message": "hi"})))
        .await
        .unwrap();
    let cid = comment["id"].as_i64().unwrap();

    let soft = gw.delete("post", pid).await.unwrap();
    assert_eq!(soft["is_deleted"], true);
    assert_eq!(gw.get("post", pid).await.unwrap()["is_deleted"], true);
    assert!(gw.get("comment", cid).await.is_ok());

    gw.purge("post", pid).await.unwrap();
    assert!(matches!(gw.get("post", pid).await, Err(AppError::NotFound(_))));
    assert!(matches!(gw.get("comment", cid).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_a_reply_strips_it_from_comments() {
    let app = test_app();
    let gw = &app.state.gateway;
    let post = gw.create("post", fields(json!({"title": "T", "body": "B"}))).await.unwrap();
    let r1 = gw.create("reply", fields(json!({"message": "one"}))).await.unwrap();
    let r2 = gw.create("reply", fields(json!({"message": "two"}))).await.unwrap();
    let comment = gw
        .create(
            "comment",
            fields(json!({"post": post["id"], "message": "m", "replies": [r1["id"], r2["id"]]})),
        )
        .await
        .unwrap();

    gw.delete("reply", r1["id"].as_i64().unwrap()).await.unwrap();

    let comment = gw.get("comment", comment["id"].as_i64().unwrap()).await.unwrap();
    assert_eq!(comment["replies"], json!([r2["id"]]));
}

#[tokio::test]
async fn relationship_and_uniqueness_errors_are_collected() {
    let app = test_app();
    let gw = &app.state.gateway;
    gw.create("classroom", fields(json!({"name": "A"}))).await.unwrap();
    let err = gw
        .create("comment", fields(json!({"post": 42, "message": "m", "replies": [7]})))
        .await
        .unwrap_err();
    let AppError::Validation(errors) = err else {
        panic!("expected validation error, got {:?}", err);
    };
    assert!(errors.contains("post"));
    assert!(errors.contains("replies"));

    let b = gw.create("classroom", fields(json!({"name": "B"}))).await.unwrap();
    let rename = gw
        .update("classroom", b["id"].as_i64().unwrap(), fields(json!({"name": "A"})))
        .await;
    assert!(matches!(rename, Err(AppError::Validation(_))));
    // Re-saving a record with its own unique value is fine.
    gw.update("classroom", b["id"].as_i64().unwrap(), fields(json!({"name": "B"})))
        .await
        .unwrap();
}

#[tokio::test]
async fn increment_respects_non_negative_counters() {
    let app = test_app();
    let gw = &app.state.gateway;
    let post = gw.create("post", fields(json!({"title": "T", "body": "B"}))).await.unwrap();
    let pid = post["id"].as_i64().unwrap();
    assert_eq!(gw.increment("post", pid, "number_of_likes", 3).await.unwrap()["number_of_likes"], 3);
    assert!(gw.increment("post", pid, "number_of_likes", -4).await.is_err());
    assert_eq!(gw.get("post", pid).await.unwrap()["number_of_likes"], 3);
    assert!(matches!(
        gw.increment("post", pid, "title", 1).await,
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn concurrent_creates_keep_names_unique() {
    let app = test_app();
    let gw = app.state.gateway.clone();
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let gw = gw.clone();
            tokio::spawn(async move { gw.create("classroom", fields(json!({"name": "same"}))).await })
        })
        .collect();
    let mut created = 0;
    for t in tasks {
        if t.await.unwrap().is_ok() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(gw.all("classroom").await.unwrap().len(), 1);
}
