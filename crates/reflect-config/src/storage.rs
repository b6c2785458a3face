//! Image storage configuration.
//!
//! - `STORAGE_BACKEND`: `local` (default) or `imgur`
//! - `UPLOAD_DIR`: directory for the local backend (default: `storage/uploads`)
//! - `UPLOAD_BASE_URL`: public prefix of local files (default: `http://localhost:3000/uploads`)
//! - `UPLOAD_MAX_BYTES`: maximum accepted image size (default: 5 MiB)
//! - `IMGUR_CLIENT_ID`: required when the backend is `imgur`

use std::env;
use std::str::FromStr;

use crate::env_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    Imgur,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "imgur" => Ok(Self::Imgur),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub upload_dir: String,
    pub base_url: String,
    pub max_file_size: usize,
    pub imgur_client_id: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            upload_dir: "storage/uploads".to_string(),
            base_url: "http://localhost:3000/uploads".to_string(),
            max_file_size: 5 * 1024 * 1024,
            imgur_client_id: None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to local storage");
                StorageBackend::Local
            }),
            Err(_) => defaults.backend,
        };

        Self {
            backend,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            base_url: env::var("UPLOAD_BASE_URL").unwrap_or(defaults.base_url),
            max_file_size: env_or("UPLOAD_MAX_BYTES", defaults.max_file_size),
            imgur_client_id: env::var("IMGUR_CLIENT_ID").ok().filter(|s| !s.is_empty()),
        }
    }
}
