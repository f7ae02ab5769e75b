//! Common test utilities for integration tests
//!
//! Builds the full router over an in-memory store, so these tests need no
//! database, and provides request helpers that return the status code and
//! the decoded JSON body.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use dailytask_api::app::{build_router, AppState};
use dailytask_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, LogFormat};
use dailytask_shared::store::MemoryStore;
use serde_json::Value;
use tower::Service as _;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context holding a router over a fresh store
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        let config = test_config();
        let state = AppState::new(MemoryStore::new(), config.clone())
            .expect("Failed to build application state");

        Self {
            app: build_router(state),
            config,
        }
    }

    /// Sends a request and returns the status with the JSON body
    ///
    /// The body is `Value::Null` when the response has none.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call(request).await
    }

    /// Sends a prebuilt request
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    /// Registers a user and returns its ID
    pub async fn register(&self, username: &str, email: &str, password: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        body["user"]["id"].as_i64().unwrap()
    }

    /// Logs in and returns the token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in a user named `username`
    pub async fn user_token(&self, username: &str) -> String {
        let password = format!("{}-password", username);
        self.register(username, &format!("{}@example.com", username), &password)
            .await;
        self.login(username, &password).await
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/tasks",
                Some(token),
                Some(serde_json::json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);

        body
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec![HeaderValue::from_static("*")],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            ttl_hours: 24,
        },
        log_format: LogFormat::Pretty,
    }
}
