use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use reflect_auth::create_access_token;
use reflect_config::JwtConfig;
use reflect_core::{AppError, verify_password};
use reflect_models::{LoginRequest, LoginResponse, UserWithPassword};

use crate::modules::users::service::USER_COLUMNS;

pub struct AuthService;

impl AuthService {
    /// Unknown usernames and wrong passwords both yield 404 "User not found".
    #[instrument(skip(db, dto, jwt_config), fields(user.username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let not_found = || AppError::not_found(anyhow!("User not found"));

        let record = sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {}, password_hash FROM users WHERE LOWER(username) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            warn!("Login for unknown username");
            not_found()
        })?;

        if !verify_password(&dto.password, &record.password_hash)? {
            warn!(user.id = record.user.id, "Login with wrong password");
            return Err(not_found());
        }

        let user = record.user;
        let access_token = create_access_token(&user.identity(), jwt_config)?;

        info!(user.id = user.id, user.role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}
