mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_article, create_test_user, generate_unique_email,
    generate_unique_username, get_auth_token, json_request, setup_test_app,
};
use reflect_auth::roles;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn registration(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": "password123",
        "email": email,
        "given_name": "Ada",
        "family_name": "Lovelace"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_anonymous_creates_reader(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let username = generate_unique_username();
    let email = generate_unique_email();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            Some(registration(&username, &email)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], username);
    assert_eq!(body["role"], roles::READER);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let existing = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            Some(registration(&existing.username, &generate_unique_email())),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Username already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let existing = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            Some(registration(&generate_unique_username(), &existing.email)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_invalid_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            Some(registration(&generate_unique_username(), "not-an-email")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            Some(json!({ "username": "ada", "password": "password123" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_paginates_and_searches(pool: PgPool) {
    let reader = create_test_user(&pool, roles::READER).await;
    for _ in 0..4 {
        create_test_user(&pool, roles::AUTHOR).await;
    }
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &reader).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/users?page=2&page_size=2",
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["page"], 2);
    assert_eq!(body["page_size"], 2);
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/users?search={}", reader.email.to_uppercase()),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["data"][0]["id"], reader.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_not_found(pool: PgPool) {
    let reader = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &reader).await;

    let response = app
        .oneshot(json_request("GET", "/api/users/999999", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_self(pool: PgPool) {
    let user = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &user).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{}", user.id),
            Some(&token),
            Some(json!({
                "username": user.username,
                "email": user.email,
                "given_name": "Grace",
                "family_name": "Hopper",
                "role": roles::READER
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["given_name"], "Grace");
    assert_eq!(body["family_name"], "Hopper");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_own_role_forbidden(pool: PgPool) {
    let user = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &user).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{}", user.id),
            Some(&token),
            Some(json!({
                "username": user.username,
                "email": user.email,
                "given_name": "Test",
                "family_name": "User",
                "role": roles::ADMINISTRATOR
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_other_user_forbidden(pool: PgPool) {
    let user = create_test_user(&pool, roles::AUTHOR).await;
    let other = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &user).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{}", other.id),
            Some(&token),
            Some(json!({
                "username": other.username,
                "email": other.email,
                "given_name": "Test",
                "family_name": "User",
                "role": roles::READER
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_changes_role_and_password(pool: PgPool) {
    let admin = create_test_user(&pool, roles::ADMINISTRATOR).await;
    let mut user = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &admin).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{}", user.id),
            Some(&token),
            Some(json!({
                "username": user.username,
                "email": user.email,
                "given_name": "Test",
                "family_name": "User",
                "role": roles::AUTHOR,
                "password": "brand-new-secret"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], roles::AUTHOR);

    user.password = "brand-new-secret".to_string();
    get_auth_token(&app, &user).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_update_missing_user(pool: PgPool) {
    let admin = create_test_user(&pool, roles::ADMINISTRATOR).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &admin).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/users/999999",
            Some(&token),
            Some(json!({
                "username": "ghost",
                "email": "ghost@test.com",
                "given_name": "No",
                "family_name": "One",
                "role": roles::READER
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_self(pool: PgPool) {
    let user = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &user).await;

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/users/{}", user.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Deleted User!");

    let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_other_user_forbidden(pool: PgPool) {
    let user = create_test_user(&pool, roles::EDITOR).await;
    let other = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &user).await;

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/users/{}", other.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_deletes_missing_user(pool: PgPool) {
    let admin = create_test_user(&pool, roles::ADMINISTRATOR).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &admin).await;

    let response = app
        .oneshot(json_request("DELETE", "/api/users/999999", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_greetings_by_role(pool: PgPool) {
    let admin = create_test_user(&pool, roles::ADMINISTRATOR).await;
    let editor = create_test_user(&pool, roles::EDITOR).await;
    let reader = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());

    let admin_token = get_auth_token(&app, &admin).await;
    let editor_token = get_auth_token(&app, &editor).await;
    let reader_token = get_auth_token(&app, &reader).await;

    let cases = [
        ("/api/users/admins", &admin_token, StatusCode::OK, Some("Hi Test, you are an Administrator")),
        ("/api/users/admins", &editor_token, StatusCode::FORBIDDEN, None),
        ("/api/users/editors", &editor_token, StatusCode::OK, Some("Hi Test, you are a Editor")),
        ("/api/users/editors", &admin_token, StatusCode::FORBIDDEN, None),
        ("/api/users/admins-and-editors", &admin_token, StatusCode::OK, Some("Hi Test, you are an Administrator")),
        ("/api/users/admins-and-editors", &editor_token, StatusCode::OK, Some("Hi Test, you are an Editor")),
        ("/api/users/admins-and-editors", &reader_token, StatusCode::FORBIDDEN, None),
    ];

    for (uri, token, status, message) in cases {
        let response = app
            .clone()
            .oneshot(json_request("GET", uri, Some(token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), status, "{}", uri);

        if let Some(message) = message {
            let body = body_json(response).await;
            assert_eq!(body["message"], message);
        }
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_user_keeps_articles(pool: PgPool) {
    let author = create_test_user(&pool, roles::AUTHOR).await;
    let article = create_test_article(&pool, "Left behind", author.id, None).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &author).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/users/{}", author.id),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let author_id =
        sqlx::query_scalar::<_, Option<i64>>("SELECT author_id FROM articles WHERE id = $1")
            .bind(article)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(author_id, None);

    let reader = create_test_user(&pool, roles::READER).await;
    let token = get_auth_token(&app, &reader).await;
    let response = app
        .oneshot(json_request(
            "GET",
            &format!("/api/articles/{}", article),
            Some(&token),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Left behind");
    assert!(body["author_id"].is_null());
    assert!(body["author"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_rejects_bad_page(pool: PgPool) {
    let reader = create_test_user(&pool, roles::READER).await;
    let app = setup_test_app(pool.clone());
    let token = get_auth_token(&app, &reader).await;

    let response = app
        .oneshot(json_request("GET", "/api/users?page=abc", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query string")
    );
}
