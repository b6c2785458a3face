//! # Reflect Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret, issuer, audience and lifetime
//! - [`cors`]: allowed browser origins
//! - [`storage`]: image storage backend selection
//! - [`server`]: bind address and log directory
//!
//! # Example
//!
//! ```ignore
//! use reflect_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod storage;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};

/// Reads `key` and parses it, falling back to `default` when unset or invalid.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
