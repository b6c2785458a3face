use reflect_auth::roles;
use reflect_core::hash_password;
use sqlx::PgPool;

pub struct NewAdmin<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub given_name: &'a str,
    pub family_name: &'a str,
    pub password: &'a str,
}

/// Inserts a user with the `Administrator` role and returns its id.
///
/// Fails when the username or e-mail is already taken.
pub async fn create_admin(
    db: &PgPool,
    admin: NewAdmin<'_>,
) -> Result<i64, Box<dyn std::error::Error>> {
    let password_hash = hash_password(admin.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password_hash, role, given_name, family_name)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(admin.username)
    .bind(admin.email)
    .bind(&password_hash)
    .bind(roles::ADMINISTRATOR)
    .bind(admin.given_name)
    .bind(admin.family_name)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "A user with this username or email already exists".into())
}
