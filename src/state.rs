use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use reflect_config::{CorsConfig, JwtConfig, StorageBackend, StorageConfig};
use reflect_core::{FileStorage, ImgurStorage, LocalFileStorage};
use reflect_db::{DatabaseConfig, init_db_pool, run_migrations};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub storage: Arc<dyn FileStorage>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        storage_config: StorageConfig,
    ) -> anyhow::Result<Self> {
        let storage = build_storage(&storage_config)?;
        Ok(Self {
            db,
            jwt_config,
            cors_config,
            storage_config,
            storage,
        })
    }
}

/// Picks the image backend named by `STORAGE_BACKEND`.
pub fn build_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn FileStorage>> {
    let storage: Arc<dyn FileStorage> = match config.backend {
        StorageBackend::Local => Arc::new(LocalFileStorage::with_max_size(
            PathBuf::from(&config.upload_dir),
            config.base_url.clone(),
            config.max_file_size,
        )),
        StorageBackend::Imgur => {
            let client_id = config
                .imgur_client_id
                .clone()
                .context("IMGUR_CLIENT_ID must be set when STORAGE_BACKEND=imgur")?;
            Arc::new(ImgurStorage::new(client_id).with_max_file_size(config.max_file_size))
        }
    };
    Ok(storage)
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = init_db_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&db).await?;

    AppState::new(
        db,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        StorageConfig::from_env(),
    )
}
