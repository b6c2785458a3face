//! # Reflect Models
//!
//! Database rows and request/response DTOs for the Reflect Blog API.
//!
//! - [`users`]: users, registration and whole-record updates
//! - [`categories`]: article categories
//! - [`articles`]: articles and their joined author/category summaries
//! - [`auth`]: login request and response
//!
//! Request DTOs derive [`validator::Validate`]; the API rejects invalid
//! payloads with 422 before they reach a service.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod users;

pub use articles::{
    Article, ArticleDetails, ArticleRow, CreateArticleDto, ImageUploadResponse, UpdateArticleDto,
};
pub use auth::{LoginRequest, LoginResponse, MessageResponse};
pub use categories::{Category, CategoryDto, CategorySummary};
pub use users::{CreateUserDto, UpdateUserDto, User, UserSummary, UserWithPassword};
