#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cardintake_api::auth::jwt::JwtConfig;
use cardintake_api::auth::password::hash_password;
use cardintake_api::config::ServerConfig;
use cardintake_api::router::build_app_router;
use cardintake_api::state::AppState;
use cardintake_db::models::admin_user::{AdminUser, CreateAdminUser};
use cardintake_db::repositories::AdminUserRepo;
use cardintake_events::{
    EmailError, Mailer, NotificationDispatcher, NotificationSettings, OutgoingEmail,
};
use cardintake_storage::{ObjectStore, StorageBackend, StorageConfig, StorageError};

pub const TEST_ADMIN_EMAIL: &str = "staff@cards.test";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
        },
        admin_bootstrap: None,
        storage: StorageConfig {
            backend: StorageBackend::S3 {
                bucket: "test-bucket".to_string(),
                endpoint: None,
                public_base_url: Some("https://cdn.test".to_string()),
            },
        },
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory object store. Any key whose file name contains one of
/// `fail_on` is rejected.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<(String, usize, String)>>,
    pub fail_on: Vec<String>,
}

impl MemoryStore {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: vec![name.to_string()],
            ..Default::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(k, _, _)| k.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        if self.fail_on.iter().any(|f| key.contains(f.as_str())) {
            return Err(StorageError::S3("simulated outage".into()));
        }
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), bytes.len(), content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

/// Mailer that records messages instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
        let mut sent = self.sent.lock().unwrap();
        let id = format!("<msg-{}@cards.test>", sent.len());
        sent.push(email);
        Ok(id)
    }
}

pub fn test_settings() -> NotificationSettings {
    NotificationSettings {
        admin_email: "owner@cards.test".to_string(),
        from_address: "Card Intake <noreply@cards.test>".to_string(),
        site_url: "https://cards.test".to_string(),
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full router with an in-memory store and notifications disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(MemoryStore::default()), None)
}

/// Full router with the given store and mailer.
///
/// Mirrors `main.rs` through [`build_app_router`], so tests exercise the
/// production middleware stack.
pub fn build_test_app_with(
    pool: PgPool,
    object_store: Arc<dyn ObjectStore>,
    mailer: Option<Arc<dyn Mailer>>,
) -> Router {
    let config = test_config();
    let dispatcher = mailer
        .map(|m| Arc::new(NotificationDispatcher::new(pool.clone(), m, test_settings())));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        object_store,
        dispatcher,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_admin(pool: &PgPool) -> AdminUser {
    let password_hash = hash_password(TEST_ADMIN_PASSWORD).expect("hashing should succeed");
    AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            email: TEST_ADMIN_EMAIL.to_string(),
            password_hash,
        },
    )
    .await
    .expect("admin creation should succeed")
}

/// Create the test admin and sign in, returning the bearer token.
pub async fn admin_token(pool: &PgPool) -> String {
    create_admin(pool).await;
    let body = serde_json::json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD });
    let response = post_json(build_test_app(pool.clone()), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "cardintake-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

/// A body with every required field filled in.
pub fn complete_form() -> MultipartBody {
    MultipartBody::default()
        .text("name", "Brock Harrison")
        .text("email", "brock@example.com")
        .text("phone", "555-0199")
        .text("description", "Two binders of first edition rock types")
        .text("address", "12 Boulder Rd")
        .text("city", "Pewter")
        .text("state", "OR")
        .text("zipCode", "97001")
        .text("priceRange", "300-400")
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an arbitrary body with the given content type.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
