use std::env;

use crate::env_or;

pub const DEFAULT_ISSUER: &str = "reflect-blog";
pub const DEFAULT_AUDIENCE: &str = "reflect-blog-clients";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime in seconds
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET is not set, using the development secret");
            "your-secret-key-change-in-production".to_string()
        });

        Self {
            secret,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string()),
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", 7200), // 2 hours
        }
    }
}
