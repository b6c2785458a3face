//! Request authentication and role-based authorization.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor, which validates the
//!   bearer token and exposes its claims
//! - [`role`]: route-layer middleware and extractors that gate on the role claim
//!
//! A missing or invalid token is rejected with 401. A valid token whose role
//! is not allowed is rejected with 403.
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireAdministrator;
//!
//! async fn whoami(auth_user: AuthUser) -> String {
//!     auth_user.0.username
//! }
//!
//! async fn admins_only(RequireAdministrator(auth_user): RequireAdministrator) {
//!     // only reached with role "Administrator"
//! }
//! ```

pub mod auth;
pub mod role;
