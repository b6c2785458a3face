//! HS256 access tokens.
//!
//! Tokens carry the issuer and audience from [`JwtConfig`], and
//! verification rejects tokens minted for a different issuer or audience
//! as well as expired or tampered ones.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use reflect_config::JwtConfig;
use reflect_core::AppError;

use crate::claims::{Claims, TokenIdentity};

/// Creates a signed access token for `identity`, valid for
/// `jwt_config.access_token_expiry` seconds.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    identity: &TokenIdentity<'_>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: identity.user_id.to_string(),
        user_id: identity.user_id,
        username: identity.username.to_string(),
        email: identity.email.to_string(),
        given_name: identity.given_name.to_string(),
        family_name: identity.family_name.to_string(),
        role: identity.role.to_string(),
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
        exp,
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature, expiry, issuer and audience, and returns the claims.
///
/// # Errors
///
/// Returns an unauthorized error for any invalid token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&jwt_config.issuer]);
    validation.set_audience(&[&jwt_config.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
