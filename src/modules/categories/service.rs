use anyhow::anyhow;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument, warn};

use reflect_core::{AppError, ListParams, PagedInfo};
use reflect_models::{Category, CategoryDto};

const CATEGORY_COLUMNS: &str = "id, name, is_default, created_at, updated_at";

fn map_category_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("categories_single_default") => "Another category is already the default",
            _ => "Category name already exists",
        };
        warn!(constraint = ?db_err.constraint(), "Unique violation writing category");
        return AppError::bad_request(anyhow!(message));
    }
    AppError::from(e)
}

/// Clears `is_default` everywhere except on `keep`, so the partial unique
/// index never sees two defaults.
async fn clear_other_defaults(
    tx: &mut Transaction<'_, Postgres>,
    keep: Option<i64>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE categories SET is_default = FALSE, updated_at = NOW()
         WHERE is_default AND ($1::BIGINT IS NULL OR id <> $1)",
    )
    .bind(keep)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db, params), fields(db.operation = "SELECT", db.table = "categories"))]
    pub async fn get_categories(
        db: &PgPool,
        params: &ListParams,
    ) -> Result<PagedInfo<Category>, AppError> {
        let pattern = params.search_pattern();
        let where_clause = if pattern.is_some() {
            " WHERE name ILIKE $1"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM categories{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(pattern) = &pattern {
            count_sql = count_sql.bind(pattern);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM categories{} ORDER BY id LIMIT {} OFFSET {}",
            CATEGORY_COLUMNS,
            where_clause,
            params.page_size(),
            params.offset()
        );
        let mut data_sql = sqlx::query_as::<_, Category>(&data_query);
        if let Some(pattern) = &pattern {
            data_sql = data_sql.bind(pattern);
        }
        let categories = data_sql.fetch_all(db).await?;

        debug!(count = categories.len(), total, "Fetched categories");
        Ok(params.paged(categories, total))
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &PgPool, id: i64) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))
    }

    #[instrument(skip(db, dto), fields(category.name = %dto.name, db.operation = "INSERT", db.table = "categories"))]
    pub async fn create_category(db: &PgPool, dto: CategoryDto) -> Result<Category, AppError> {
        let mut tx = db.begin().await?;

        if dto.is_default {
            clear_other_defaults(&mut tx, None).await?;
        }

        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, is_default) VALUES ($1, $2) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(&dto.name)
        .bind(dto.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_category_write_error)?;

        tx.commit().await?;

        info!(category.id = category.id, category.name = %category.name, "Category created");
        Ok(category)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "categories"))]
    pub async fn update_category(
        db: &PgPool,
        id: i64,
        dto: CategoryDto,
    ) -> Result<Category, AppError> {
        let mut tx = db.begin().await?;

        if dto.is_default {
            clear_other_defaults(&mut tx, Some(id)).await?;
        }

        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $2, is_default = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.is_default)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_category_write_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Category not found")))?;

        tx.commit().await?;

        info!(category.id = id, "Category updated");
        Ok(category)
    }

    /// Articles in the category keep existing with a null `category_id`.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "categories"))]
    pub async fn delete_category(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Category not found")));
        }

        info!(category.id = id, "Category deleted");
        Ok(())
    }

    /// The category new articles fall back to, if one is flagged.
    pub async fn default_category_id(db: &PgPool) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM categories WHERE is_default ORDER BY id LIMIT 1",
        )
        .fetch_optional(db)
        .await?;
        Ok(id)
    }
}
