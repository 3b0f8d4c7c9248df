#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use catalog_api::auth::jwt::{Claims, JwtConfig};
use catalog_api::config::ServerConfig;
use catalog_api::media::{MediaConfig, MediaError, MediaStore, StoredMedia, UploadRequest};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_core::types::DbId;
use catalog_core::webhook::{WebhookSecret, HEADER_ID, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use catalog_db::models::owner::CreateOwner;
use catalog_db::repositories::OwnerRepo;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const WEBHOOK_KEY: &[u8] = b"test-webhook-signing-key";
pub const CLOUD_NAME: &str = "demo-cloud";

/// Smallest byte string `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig::hs256(JWT_SECRET, None),
        webhook_secret: WebhookSecret::from_bytes(WEBHOOK_KEY),
        media: MediaConfig {
            cloud_name: Some(CLOUD_NAME.to_string()),
            max_upload_bytes: 1024,
            ..MediaConfig::default()
        },
    }
}

/// Build the full application router without a media store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Build the full application router backed by the given in-memory store.
pub fn build_test_app_with_media(pool: PgPool, media: Arc<FakeMediaStore>) -> Router {
    build_app(pool, Some(media as Arc<dyn MediaStore>))
}

fn build_app(pool: PgPool, media: Option<Arc<dyn MediaStore>>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identity helpers
// ---------------------------------------------------------------------------

/// Mint a session token for `external_id`, valid for ten minutes.
pub fn token_for(external_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: external_id.to_string(),
        exp: now + 600,
        iat: Some(now),
        iss: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Insert an owner row and return a token for it.
pub async fn provision(pool: &PgPool, external_id: &str) -> (DbId, String) {
    let input = CreateOwner {
        external_id: external_id.to_string(),
        full_name: external_id.to_string(),
        ..CreateOwner::default()
    };
    let (owner, _) = OwnerRepo::create_if_absent(pool, &input).await.unwrap();
    (owner.id, token_for(external_id))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Read the whole response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a category through the API and return its id.
pub async fn create_category(
    pool: &PgPool,
    token: &str,
    body: serde_json::Value,
) -> DbId {
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/category", token, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, 201, "category create failed: {json}");
    json["category_id"].as_i64().unwrap()
}

/// Minimal valid category body.
pub fn category_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": format!("{name} description"),
        "is_public": true,
        "category_image_ids": [format!("{}-img", name.to_lowercase())],
    })
}

// ---------------------------------------------------------------------------
// Webhook helpers
// ---------------------------------------------------------------------------

/// POST a webhook delivery signed with the test key.
pub async fn post_signed_webhook(app: Router, body: &serde_json::Value) -> Response<Body> {
    let raw = serde_json::to_vec(body).unwrap();
    let msg_id = "msg_test";
    let timestamp = chrono::Utc::now().timestamp();
    let signature = WebhookSecret::from_bytes(WEBHOOK_KEY).sign(msg_id, timestamp, &raw);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/user")
        .header("content-type", "application/json")
        .header(HEADER_ID, msg_id)
        .header(HEADER_TIMESTAMP, timestamp.to_string())
        .header(HEADER_SIGNATURE, format!("v1,{signature}"))
        .body(Body::from(raw))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// In-memory media store
// ---------------------------------------------------------------------------

/// Records uploads and deletes. Deleting `"missing"` is refused the way the
/// real host answers `not found`.
#[derive(Default)]
pub struct FakeMediaStore {
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, request: UploadRequest) -> Result<StoredMedia, MediaError> {
        let public_id = match &request.public_id {
            Some(id) => format!("{}/{id}", request.folder),
            None => format!("{}/generated", request.folder),
        };
        self.uploads.lock().unwrap().push(request);
        Ok(StoredMedia {
            url: format!("http://media.test/{public_id}.png"),
            secure_url: format!("https://media.test/{public_id}.png"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if public_id == "missing" {
            return Err(MediaError::DeleteRejected("not found".into()));
        }
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}
