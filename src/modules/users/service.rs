use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use reflect_auth::roles;
use reflect_core::{AppError, ListParams, PagedInfo, hash_password};
use reflect_models::{CreateUserDto, UpdateUserDto, User};

pub(crate) const USER_COLUMNS: &str =
    "id, username, email, role, given_name, family_name, created_at, updated_at";

/// Maps the unique indexes on `users` to a 400 naming the taken field.
fn map_user_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        let message = match db_err.constraint() {
            Some("users_email_lower_key") => "Email already exists",
            _ => "Username already exists",
        };
        warn!(constraint = ?db_err.constraint(), "Unique violation writing user");
        return AppError::bad_request(anyhow!(message));
    }
    error!(error = %e, "Database error writing user");
    AppError::from(e)
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, params), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn get_users(db: &PgPool, params: &ListParams) -> Result<PagedInfo<User>, AppError> {
        let pattern = params.search_pattern();
        let where_clause = if pattern.is_some() {
            " WHERE given_name ILIKE $1 OR family_name ILIKE $1 OR email ILIKE $1"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM users{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(pattern) = &pattern {
            count_sql = count_sql.bind(pattern);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM users{} ORDER BY id LIMIT {} OFFSET {}",
            USER_COLUMNS,
            where_clause,
            params.page_size(),
            params.offset()
        );
        let mut data_sql = sqlx::query_as::<_, User>(&data_query);
        if let Some(pattern) = &pattern {
            data_sql = data_sql.bind(pattern);
        }
        let users = data_sql.fetch_all(db).await?;

        debug!(count = users.len(), total, "Fetched users");
        Ok(params.paged(users, total))
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Registers a user with the `Reader` role.
    #[instrument(skip(db, dto), fields(user.username = %dto.username, db.operation = "INSERT", db.table = "users"))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, role, given_name, family_name)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(roles::READER)
        .bind(&dto.given_name)
        .bind(&dto.family_name)
        .fetch_one(db)
        .await
        .map_err(map_user_write_error)?;

        info!(user.id = user.id, user.username = %user.username, "User created");
        Ok(user)
    }

    /// Replaces a user's fields. A role change is refused with 403 unless
    /// `may_change_role` is set.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_user(
        db: &PgPool,
        id: i64,
        dto: UpdateUserDto,
        may_change_role: bool,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        if existing.role != dto.role && !may_change_role {
            warn!(user.id = id, from = %existing.role, to = %dto.role, "Role change refused");
            return Err(AppError::forbidden(
                "Only administrators can change a user's role".to_string(),
            ));
        }

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET username = $2, email = $3, given_name = $4, family_name = $5, role = $6,
                 password_hash = COALESCE($7, password_hash), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&dto.given_name)
        .bind(&dto.family_name)
        .bind(&dto.role)
        .bind(password_hash)
        .fetch_optional(db)
        .await
        .map_err(map_user_write_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        info!(user.id = user.id, "User updated");
        Ok(user)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "users"))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        info!(user.id = id, "User deleted");
        Ok(())
    }
}
