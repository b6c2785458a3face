//! Role-based authorization.
//!
//! Three ways to gate on the role claim:
//! 1. Route-layer middleware: [`require_roles`] and its wrappers
//! 2. Extractors: [`RequireAdministrator`], [`RequireEditor`],
//!    [`RequireAdminOrEditor`], [`RequireArticleWriter`]
//! 3. Helpers for checks inside a handler: [`check_role`], [`check_any_role`]

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use reflect_auth::roles;
use reflect_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request unless the caller's role is one of `allowed_roles`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/images", post(upload_image))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_article_writer));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[&str],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_administrator(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(State(state), req, next, &[roles::ADMINISTRATOR])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// `Administrator` or `Author`.
pub async fn require_article_writer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(State(state), req, next, roles::ARTICLE_WRITERS)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Declares an extractor that wraps [`AuthUser`] and only succeeds for the
/// listed roles.
macro_rules! require_roles {
    ($(#[$meta:meta])* $name:ident, [$($role:expr),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = AuthUser::from_request_parts(parts, state).await?;
                check_any_role(&auth_user, &[$($role),+])?;
                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireAdministrator, [roles::ADMINISTRATOR]);
require_roles!(RequireEditor, [roles::EDITOR]);
require_roles!(
    RequireAdminOrEditor,
    [roles::ADMINISTRATOR, roles::EDITOR]
);
require_roles!(
    /// `Administrator` or `Author`.
    RequireArticleWriter,
    [roles::ADMINISTRATOR, roles::AUTHOR]
);

pub fn check_role(auth_user: &AuthUser, required_role: &str) -> Result<(), AppError> {
    check_any_role(auth_user, &[required_role])
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[&str]) -> Result<(), AppError> {
    if !auth_user.has_any_role(allowed_roles) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}, but user has role: {}",
            allowed_roles.join(", "),
            auth_user.role()
        )));
    }

    Ok(())
}
