//! # Reflect Core
//!
//! Core types, errors, and utilities for the Reflect Blog API.
//!
//! - [`errors`]: application error type with HTTP response conversion
//! - [`pagination`]: list query parameters and the paged response envelope
//! - [`password`]: Argon2 password hashing and verification
//! - [`file_storage`]: pluggable storage for uploaded images
//! - [`serde`]: query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use reflect_core::{AppError, ListParams, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Article not found"));
//! let hash = hash_password("secure_password")?;
//! let offset = ListParams::default().offset();
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use file_storage::{FileStorage, ImgurStorage, LocalFileStorage, StorageError, StoredFile};
pub use pagination::{ListParams, PagedInfo};
pub use password::{hash_password, verify_password};
