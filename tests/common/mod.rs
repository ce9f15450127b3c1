//! Shared harness: the real router over a temporary database, talking to an
//! in-process stand-in for the category/budget service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use spend_analytics::auth::Claims;
use spend_analytics::config::{default_cors_origins, Config};
use spend_analytics::server::{build_app, serve};
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// A request the fake budgeting service received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub correlation_id: Option<String>,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
pub struct FakeUpstream {
    budgets: Arc<Mutex<Reply>>,
    categories: Arc<Mutex<Reply>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    pub base_url: String,
}

impl FakeUpstream {
    pub async fn start() -> Self {
        let empty = Reply {
            status: StatusCode::OK,
            body: "[]".into(),
        };
        let mut fake = Self {
            budgets: Arc::new(Mutex::new(empty.clone())),
            categories: Arc::new(Mutex::new(empty)),
            seen: Arc::new(Mutex::new(Vec::new())),
            base_url: String::new(),
        };

        let router = Router::new()
            .route("/:user_id/budgets", get(budgets))
            .route("/:user_id/categories", get(categories))
            .with_state(fake.clone());
        let (port, _handle) = serve(router, "127.0.0.1", 0).await.unwrap();

        fake.base_url = format!("http://127.0.0.1:{}", port);
        fake
    }

    pub fn set_budgets(&self, body: Value) {
        *self.budgets.lock().unwrap() = Reply {
            status: StatusCode::OK,
            body: body.to_string(),
        };
    }

    pub fn set_categories(&self, body: Value) {
        *self.categories.lock().unwrap() = Reply {
            status: StatusCode::OK,
            body: body.to_string(),
        };
    }

    pub fn reply_categories(&self, status: StatusCode, body: &str) {
        *self.categories.lock().unwrap() = Reply {
            status,
            body: body.into(),
        };
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn record(&self, path: String, query: HashMap<String, String>, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        self.seen.lock().unwrap().push(SeenRequest {
            path,
            query,
            authorization: header("authorization"),
            correlation_id: header("x-correlation-id"),
        });
    }
}

async fn budgets(
    State(fake): State<FakeUpstream>,
    Path(user_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    fake.record(format!("/{}/budgets", user_id), query, &headers);
    let reply = fake.budgets.lock().unwrap().clone();
    (reply.status, reply.body)
}

async fn categories(
    State(fake): State<FakeUpstream>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    fake.record(format!("/{}/categories", user_id), HashMap::new(), &headers);
    let reply = fake.categories.lock().unwrap().clone();
    (reply.status, reply.body)
}

pub fn token_for(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.into(),
        token_type: Some("access".into()),
        exp: Some(chrono::Utc::now().timestamp() + 3600),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    app: Router,
    pub upstream: FakeUpstream,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let upstream = FakeUpstream::start().await;
        let dir = TempDir::new().unwrap();

        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            database_path: dir.path().join("analytics.db"),
            upstream_base_url: upstream.base_url.clone(),
            upstream_timeout: Duration::from_secs(5),
            jwt_secret: JWT_SECRET.into(),
            cors_origins: default_cors_origins(),
        };
        let (_, app) = build_app(config).unwrap();

        Self {
            app,
            upstream,
            _dir: dir,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        correlation_id: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(id) = correlation_id {
            builder = builder.header("X-Correlation-Id", id);
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes).to_string()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Request authenticated as `user_id`.
    pub async fn as_user(
        &self,
        user_id: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let token = token_for(user_id);
        self.send(method, uri, Some(&token), body, None).await
    }
}
