use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use reflect_blog::reflect_config::{CorsConfig, JwtConfig, StorageBackend, StorageConfig};
use reflect_blog::router::init_router;
use reflect_blog::state::AppState;
use reflect_core::hash_password;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub fn generate_unique_username() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_category_name() -> String {
    format!("Category {}", Uuid::new_v4())
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        issuer: "reflect-blog".to_string(),
        audience: "reflect-blog-clients".to_string(),
        access_token_expiry: 3600,
    }
}

/// Router wired like production, with images stored in a fresh temp dir.
pub fn setup_test_app(pool: PgPool) -> Router {
    let upload_dir = std::env::temp_dir().join(format!("reflect-uploads-{}", Uuid::new_v4()));
    let storage_config = StorageConfig {
        backend: StorageBackend::Local,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        base_url: "http://localhost:3000/uploads".to_string(),
        max_file_size: 1024 * 1024,
        imgur_client_id: None,
    };

    let state = AppState::new(
        pool,
        test_jwt_config(),
        CorsConfig::from_list("http://localhost:3000"),
        storage_config,
    )
    .unwrap();
    init_router(state)
}

/// Inserts a user with `role` directly, bypassing registration.
pub async fn create_test_user(pool: &PgPool, role: &str) -> TestUser {
    let username = generate_unique_username();
    let email = format!("{}@test.com", username);
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password_hash, role, given_name, family_name)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .bind(role)
    .bind("Test")
    .bind("User")
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        email,
        password: TEST_PASSWORD.to_string(),
        role: role.to_string(),
    }
}

#[allow(dead_code)]
pub async fn create_test_category(pool: &PgPool, name: &str, is_default: bool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, is_default) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(is_default)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn create_test_article(
    pool: &PgPool,
    title: &str,
    author_id: i64,
    category_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO articles (title, content, author_id, category_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(title)
    .bind(format!("Content of {}", title))
    .bind(author_id)
    .bind(category_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in through `POST /api/login` and returns the bearer token.
pub async fn get_auth_token(app: &Router, user: &TestUser) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "username": user.username, "password": user.password }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

/// Builds a JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
