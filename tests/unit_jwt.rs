use axum::http::StatusCode;
use reflect_auth::{TokenIdentity, create_access_token, roles, verify_token};
use reflect_config::JwtConfig;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        issuer: "reflect-blog".to_string(),
        audience: "reflect-blog-clients".to_string(),
        access_token_expiry: 3600,
    }
}

fn identity(role: &str) -> TokenIdentity<'_> {
    TokenIdentity {
        user_id: 42,
        username: "ada",
        email: "ada@example.com",
        given_name: "Ada",
        family_name: "Lovelace",
        role,
    }
}

#[test]
fn test_create_access_token_all_roles() {
    let jwt_config = get_test_jwt_config();

    for role in [roles::ADMINISTRATOR, roles::AUTHOR, roles::EDITOR, roles::READER] {
        let token = create_access_token(&identity(role), &jwt_config).unwrap();
        assert!(!token.is_empty());
    }
}

#[test]
fn test_verify_token_round_trips_identity() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(&identity(roles::AUTHOR), &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.user_id, 42);
    assert_eq!(claims.username, "ada");
    assert_eq!(claims.given_name, "Ada");
    assert_eq!(claims.role, roles::AUTHOR);
    assert_eq!(claims.iss, "reflect-blog");
    assert_eq!(claims.aud, "reflect-blog-clients");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(&identity(roles::READER), &jwt_config).unwrap();

    let other = JwtConfig {
        secret: "a_completely_different_secret".to_string(),
        ..get_test_jwt_config()
    };
    let err = verify_token(&token, &other).unwrap_err();

    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_verify_token_wrong_audience() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(&identity(roles::READER), &jwt_config).unwrap();

    let other = JwtConfig {
        audience: "someone-else".to_string(),
        ..get_test_jwt_config()
    };

    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_verify_token_wrong_issuer() {
    let jwt_config = get_test_jwt_config();
    let token = create_access_token(&identity(roles::READER), &jwt_config).unwrap();

    let other = JwtConfig {
        issuer: "another-service".to_string(),
        ..get_test_jwt_config()
    };

    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_verify_token_garbage() {
    let jwt_config = get_test_jwt_config();

    assert!(verify_token("", &jwt_config).is_err());
    assert!(verify_token("not.a.token", &jwt_config).is_err());
}
