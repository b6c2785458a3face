//! File storage abstraction for article images.
//!
//! Two backends implement [`FileStorage`]:
//!
//! - [`LocalFileStorage`] writes under a directory that the API serves
//!   statically (`/uploads` by default).
//! - [`ImgurStorage`] uploads to the Imgur image API and keeps the returned
//!   `deletehash` as the storage key.
//!
//! # Example
//!
//! ```ignore
//! use reflect_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("storage/uploads"),
//!     "http://localhost:3000/uploads".to_string(),
//! );
//!
//! let stored = storage.save("articles/3f2a.png", &bytes, "image/png").await?;
//! println!("{}", stored.url);
//!
//! storage.delete(&stored.key).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const IMGUR_API_URL: &str = "https://api.imgur.com/3";

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Where a saved file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Backend-specific key, accepted by [`FileStorage::delete`]
    pub key: String,
    /// Public URL of the file
    pub url: String,
}

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync + fmt::Debug {
    /// Stores `content` under `key` and returns its key and public URL.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        content_type: &'a str,
    ) -> StorageFuture<'a, StoredFile>;

    /// Removes a stored file. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", .allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected by storage provider: {0}")]
    Upstream(String),
}

impl StorageError {
    /// Whether the error was caused by the uploaded file rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileSize { .. } | Self::InvalidMimeType { .. } | Self::InvalidKey(_)
        )
    }
}

fn default_mime_types() -> Vec<String> {
    vec![
        "image/png".to_string(),
        "image/jpeg".to_string(),
        "image/webp".to_string(),
    ]
}

fn check_size(content: &[u8], max_bytes: usize) -> Result<(), StorageError> {
    if content.len() > max_bytes {
        return Err(StorageError::InvalidFileSize { max_bytes });
    }
    Ok(())
}

fn check_mime(content_type: &str, allowed: &[String]) -> Result<(), StorageError> {
    if !allowed.iter().any(|m| m == content_type) {
        return Err(StorageError::InvalidMimeType {
            received: content_type.to_string(),
            allowed: allowed.to_vec(),
        });
    }
    Ok(())
}

/// Local filesystem-based file storage implementation.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    /// Public URL prefix, e.g. `http://localhost:3000/uploads`
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types: default_mime_types(),
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    pub fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        content_type: &'a str,
    ) -> StorageFuture<'a, StoredFile> {
        Box::pin(async move {
            Self::validate_key(key)?;
            check_size(content, self.max_file_size)?;
            check_mime(content_type, &self.allowed_mime_types)?;

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(StoredFile {
                key: key.to_string(),
                url: self.get_url(key)?,
            })
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct ImgurResponse {
    success: bool,
    status: u16,
    data: Option<ImgurImage>,
}

#[derive(Debug, Deserialize)]
struct ImgurImage {
    link: Option<String>,
    deletehash: Option<String>,
}

/// Imgur-backed storage. Anonymous uploads authenticated with a client id.
#[derive(Clone)]
pub struct ImgurStorage {
    client: reqwest::Client,
    client_id: String,
    api_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl fmt::Debug for ImgurStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImgurStorage")
            .field("api_url", &self.api_url)
            .field("max_file_size", &self.max_file_size)
            .finish_non_exhaustive()
    }
}

impl ImgurStorage {
    pub fn new(client_id: String) -> Self {
        Self::with_api_url(client_id, IMGUR_API_URL.to_string())
    }

    pub fn with_api_url(client_id: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            api_url: api_url.trim_end_matches('/').to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: default_mime_types(),
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: usize) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    fn authorization(&self) -> String {
        format!("Client-ID {}", self.client_id)
    }
}

impl FileStorage for ImgurStorage {
    // Imgur assigns its own name, so `key` is only used for logging.
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
        content_type: &'a str,
    ) -> StorageFuture<'a, StoredFile> {
        Box::pin(async move {
            check_size(content, self.max_file_size)?;
            check_mime(content_type, &self.allowed_mime_types)?;

            let encoded = data_encoding::BASE64.encode(content);
            let response: ImgurResponse = self
                .client
                .post(format!("{}/image", self.api_url))
                .header(reqwest::header::AUTHORIZATION, self.authorization())
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(encoded)
                .send()
                .await?
                .json()
                .await?;

            let image = match response {
                ImgurResponse {
                    success: true,
                    data: Some(image),
                    ..
                } => image,
                ImgurResponse { status, .. } => {
                    return Err(StorageError::Upstream(format!(
                        "status {} for {}",
                        status, key
                    )));
                }
            };

            match (image.link, image.deletehash) {
                (Some(url), Some(key)) => Ok(StoredFile { key, url }),
                _ => Err(StorageError::Upstream(
                    "response is missing link or deletehash".to_string(),
                )),
            }
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let response = self
                .client
                .delete(format!("{}/image/{}", self.api_url, key))
                .header(reqwest::header::AUTHORIZATION, self.authorization())
                .send()
                .await?;

            if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND
            {
                Ok(())
            } else {
                Err(StorageError::Upstream(format!(
                    "delete returned {}",
                    response.status()
                )))
            }
        })
    }
}
