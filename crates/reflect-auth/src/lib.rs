//! # Reflect Auth
//!
//! Authentication types and JWT utilities for the Reflect Blog API.
//!
//! - [`claims`]: the claims carried by an access token
//! - [`jwt`]: token creation and verification
//! - [`roles`]: the role names the API gates endpoints on
//!
//! # Example
//!
//! ```ignore
//! use reflect_auth::{TokenIdentity, create_access_token, verify_token};
//! use reflect_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(&user.identity(), &config)?;
//! let claims = verify_token(&token, &config)?;
//! println!("{} is {}", claims.username, claims.role);
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::{Claims, TokenIdentity};
pub use jwt::{create_access_token, verify_token};
