use std::path::Path;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use reflect_core::{AppError, FileStorage, ListParams, PagedInfo, StorageError, StoredFile};
use reflect_models::{Article, ArticleDetails, ArticleRow, CreateArticleDto, UpdateArticleDto};

use crate::modules::categories::service::CategoryService;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub const ONLY_PNG_MESSAGE: &str = "Only png files are accepted.";

const ARTICLE_COLUMNS: &str =
    "id, title, content, image_url, date, author_id, category_id, created_at, updated_at";

const ARTICLE_DETAILS_SELECT: &str = r#"SELECT
        a.id, a.title, a.content, a.image_url, a.date, a.author_id, a.category_id,
        a.created_at, a.updated_at,
        c.name AS category_name,
        c.is_default AS category_is_default,
        u.username AS author_username,
        u.email AS author_email,
        u.given_name AS author_given_name,
        u.family_name AS author_family_name
    FROM articles a
    LEFT JOIN categories c ON c.id = a.category_id
    LEFT JOIN users u ON u.id = a.author_id"#;

const ARTICLE_SEARCH_CLAUSE: &str = " WHERE a.title ILIKE $1 OR a.content ILIKE $1 \
     OR u.email ILIKE $1 OR u.given_name ILIKE $1 OR u.family_name ILIKE $1";

/// A `.png` file name (any case) whose content starts with the PNG signature.
pub fn is_png(file_name: &str, content: &[u8]) -> bool {
    let has_png_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    has_png_extension && content.starts_with(&PNG_SIGNATURE)
}

fn map_article_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_foreign_key_violation()
    {
        warn!(constraint = ?db_err.constraint(), "Foreign key violation writing article");
        return match db_err.constraint() {
            Some("articles_author_id_fkey") => {
                AppError::bad_request(anyhow!("Author no longer exists"))
            }
            _ => AppError::bad_request(anyhow!("Category not found")),
        };
    }
    error!(error = %e, "Database error writing article");
    AppError::from(e)
}

fn map_storage_error(e: StorageError) -> AppError {
    if e.is_client_error() {
        return AppError::bad_request(e);
    }
    error!(error = %e, "Image storage failed");
    AppError::internal(e)
}

pub struct ArticleService;

impl ArticleService {
    #[instrument(skip(db, params), fields(db.operation = "SELECT", db.table = "articles"))]
    pub async fn get_articles(
        db: &PgPool,
        params: &ListParams,
    ) -> Result<PagedInfo<ArticleDetails>, AppError> {
        let pattern = params.search_pattern();
        let where_clause = if pattern.is_some() {
            ARTICLE_SEARCH_CLAUSE
        } else {
            ""
        };

        let count_query = format!(
            "SELECT COUNT(*) FROM articles a LEFT JOIN users u ON u.id = a.author_id{}",
            where_clause
        );
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(pattern) = &pattern {
            count_sql = count_sql.bind(pattern);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "{}{} ORDER BY a.id LIMIT {} OFFSET {}",
            ARTICLE_DETAILS_SELECT,
            where_clause,
            params.page_size(),
            params.offset()
        );
        let mut data_sql = sqlx::query_as::<_, ArticleRow>(&data_query);
        if let Some(pattern) = &pattern {
            data_sql = data_sql.bind(pattern);
        }
        let articles: Vec<ArticleDetails> = data_sql
            .fetch_all(db)
            .await?
            .into_iter()
            .map(ArticleDetails::from)
            .collect();

        debug!(count = articles.len(), total, "Fetched articles");
        Ok(params.paged(articles, total))
    }

    #[instrument(skip(db))]
    pub async fn get_article(db: &PgPool, id: i64) -> Result<ArticleDetails, AppError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "{} WHERE a.id = $1",
            ARTICLE_DETAILS_SELECT
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Article not found")))?;

        Ok(row.into())
    }

    /// Creates an article owned by `author_id`. Without a `category_id` the
    /// default category is used, if there is one.
    #[instrument(skip(db, dto), fields(article.title = %dto.title, db.operation = "INSERT", db.table = "articles"))]
    pub async fn create_article(
        db: &PgPool,
        author_id: i64,
        dto: CreateArticleDto,
    ) -> Result<ArticleDetails, AppError> {
        let category_id = match dto.category_id {
            Some(id) => Some(id),
            None => CategoryService::default_category_id(db).await?,
        };

        let article = sqlx::query_as::<_, Article>(&format!(
            "INSERT INTO articles (title, content, image_url, date, author_id, category_id)
             VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
             RETURNING {}",
            ARTICLE_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(&dto.image_url)
        .bind(dto.date)
        .bind(author_id)
        .bind(category_id)
        .fetch_one(db)
        .await
        .map_err(map_article_write_error)?;

        info!(article.id = article.id, author.id = author_id, "Article created");
        Self::get_article(db, article.id).await
    }

    /// Fails with 400 unless the caller wrote the article or is an
    /// administrator. A missing article is a 404 first.
    async fn find_owned(
        db: &PgPool,
        id: i64,
        caller_id: i64,
        is_administrator: bool,
        denied_message: &'static str,
    ) -> Result<Article, AppError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {} FROM articles WHERE id = $1",
            ARTICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Article not found")))?;

        if !is_administrator && article.author_id != Some(caller_id) {
            warn!(article.id = id, caller.id = caller_id, "Article ownership check failed");
            return Err(AppError::bad_request(anyhow!(denied_message)));
        }

        Ok(article)
    }

    /// Replaces title, content, image, date and category. The author stays.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "articles"))]
    pub async fn update_article(
        db: &PgPool,
        id: i64,
        caller_id: i64,
        is_administrator: bool,
        dto: UpdateArticleDto,
    ) -> Result<ArticleDetails, AppError> {
        Self::find_owned(
            db,
            id,
            caller_id,
            is_administrator,
            "You can update only articles created by you!",
        )
        .await?;

        sqlx::query(
            "UPDATE articles
             SET title = $2, content = $3, image_url = $4, date = COALESCE($5, date),
                 category_id = $6, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(&dto.image_url)
        .bind(dto.date)
        .bind(dto.category_id)
        .execute(db)
        .await
        .map_err(map_article_write_error)?;

        info!(article.id = id, "Article updated");
        Self::get_article(db, id).await
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "articles"))]
    pub async fn delete_article(
        db: &PgPool,
        id: i64,
        caller_id: i64,
        is_administrator: bool,
    ) -> Result<(), AppError> {
        Self::find_owned(
            db,
            id,
            caller_id,
            is_administrator,
            "You can delete only articles created by you!",
        )
        .await?;

        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        info!(article.id = id, "Article deleted");
        Ok(())
    }

    /// Checks that the upload is a PNG and stores it as `articles/<uuid>.png`.
    #[instrument(skip(storage, content), fields(size = content.len()))]
    pub async fn store_image(
        storage: &dyn FileStorage,
        file_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, AppError> {
        if !is_png(file_name, content) {
            warn!(file_name, "Rejected non-png upload");
            return Err(AppError::bad_request(anyhow!(ONLY_PNG_MESSAGE)));
        }

        let key = format!("articles/{}.png", uuid::Uuid::new_v4());
        let stored = storage
            .save(&key, content, "image/png")
            .await
            .map_err(map_storage_error)?;

        info!(key = %stored.key, url = %stored.url, "Image stored");
        Ok(stored)
    }

    /// Best-effort removal of an image whose article could not be saved.
    pub async fn discard_image(storage: &dyn FileStorage, stored: &StoredFile) {
        if let Err(e) = storage.delete(&stored.key).await {
            warn!(key = %stored.key, error = %e, "Failed to remove orphaned image");
        }
    }
}
