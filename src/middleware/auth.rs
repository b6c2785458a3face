use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use reflect_auth::{Claims, roles, verify_token};
use reflect_core::AppError;

use crate::state::AppState;

/// The caller, as described by a validated access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    pub fn role(&self) -> &str {
        &self.0.role
    }

    pub fn given_name(&self) -> &str {
        &self.0.given_name
    }

    /// Exact, case-sensitive comparison against the role claim.
    pub fn has_role(&self, role: &str) -> bool {
        self.0.role == role
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }

    pub fn is_administrator(&self) -> bool {
        self.has_role(roles::ADMINISTRATOR)
    }

    /// Whether the caller is `user_id` or an administrator.
    pub fn is_self_or_administrator(&self, user_id: i64) -> bool {
        self.user_id() == user_id || self.is_administrator()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::unauthorized("Missing authorization header".to_string())
                    } else {
                        AppError::unauthorized("Invalid authorization header format".to_string())
                    }
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
