//! User data models and DTOs.
//!
//! # Core Types
//!
//! - [`User`]: a user as returned by the API (never includes the password hash)
//! - [`UserWithPassword`]: a user row plus its hash, used only by login
//! - [`UserSummary`]: the author block embedded in articles
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`]: anonymous registration
//! - [`UpdateUserDto`]: whole-record replace; the password is optional

use chrono::{DateTime, Utc};
use reflect_auth::TokenIdentity;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A user in the system.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Free-text role, e.g. `Administrator`, `Author`, `Editor`, `Reader`
    pub role: String,
    pub given_name: String,
    pub family_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> TokenIdentity<'_> {
        TokenIdentity {
            user_id: self.id,
            username: &self.username,
            email: &self.email,
            given_name: &self.given_name,
            family_name: &self.family_name,
            role: &self.role,
        }
    }
}

#[derive(FromRow, Debug, Clone)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Author information embedded in article responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
}

/// Registration payload. New users always start with the `Reader` role.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    #[schema(example = "ada")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Given name is required"))]
    pub given_name: String,
    #[validate(length(min = 1, max = 100, message = "Family name is required"))]
    pub family_name: String,
}

/// Replaces every editable field of a user.
///
/// Only administrators may change `role`. `password` is re-hashed when present
/// and left untouched otherwise.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Given name is required"))]
    pub given_name: String,
    #[validate(length(min = 1, max = 100, message = "Family name is required"))]
    pub family_name: String,
    #[validate(length(min = 1, max = 50, message = "Role is required"))]
    #[schema(example = "Author")]
    pub role: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}
