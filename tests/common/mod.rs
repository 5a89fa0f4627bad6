#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use edufinance::{app, AppState, EntityStore, MemoryStore, Record, Settings};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub media: TempDir,
}

pub fn test_app() -> TestApp {
    test_app_with(|_| {})
}

pub fn test_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    build(Arc::new(MemoryStore::new()), configure)
}

/// App over a caller-supplied store, e.g. one that fails on purpose.
pub fn test_app_over(store: Arc<dyn EntityStore>) -> TestApp {
    build(store, |_| {})
}

fn build(store: Arc<dyn EntityStore>, configure: impl FnOnce(&mut Settings)) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let mut settings = Settings {
        media_root: media.path().to_path_buf(),
        ..Settings::default()
    };
    configure(&mut settings);
    let state = AppState::new(store, settings).unwrap();
    let router = app(state.clone());
    TestApp { state, router, media }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        Reply { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: &str, uri: &str, body: Value) -> Reply {
        self.json_as(method, uri, body, None).await
    }

    pub async fn json_as(&self, method: &str, uri: &str, body: Value, token: Option<&str>) -> Reply {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn form(&self, uri: &str, body: &str) -> Reply {
        self.send(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Create a user directly through the gateway.
    pub async fn user(&self, username: &str, password: &str) -> Record {
        let mut fields = Record::new();
        fields.insert("username".into(), json!(username));
        fields.insert("password".into(), json!(edufinance::auth::hash_password(password).unwrap()));
        self.state.gateway.create("user", fields).await.unwrap()
    }
}

pub fn fields(value: Value) -> Record {
    match value {
        Value::Object(m) => m,
        other => panic!("expected an object, got {}", other),
    }
}

pub fn id_of(record: &Value) -> i64 {
    record["id"].as_i64().unwrap()
}
