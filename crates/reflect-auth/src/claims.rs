//! JWT claim structures for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in every access token.
///
/// They carry the caller's identity and role so handlers can authorize
/// without a database round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID as a string (subject claim)
    pub sub: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    /// Free-text role, e.g. `Administrator`
    pub role: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// The user fields that go into a token.
#[derive(Debug, Clone, Copy)]
pub struct TokenIdentity<'a> {
    pub user_id: i64,
    pub username: &'a str,
    pub email: &'a str,
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub role: &'a str,
}
