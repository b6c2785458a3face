//! Fake users, spread across the writer and reader roles.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use reflect_auth::roles;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{SEED_EMAIL_DOMAIN, UserSeed};

const SEEDED_ROLES: [&str; 3] = [roles::AUTHOR, roles::EDITOR, roles::READER];

/// Generates users in parallel. Every third user is an `Author`, so article
/// seeding always has writers when `count >= 1`.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let given_name: String = FirstName().fake();
            let family_name: String = LastName().fake();
            let username = format!(
                "{}.{}{}",
                given_name.to_lowercase(),
                family_name.to_lowercase(),
                idx
            );

            UserSeed {
                email: format!("{}@{}", username, SEED_EMAIL_DOMAIN),
                username,
                password_hash: password_hash.to_string(),
                role: SEEDED_ROLES[idx % SEEDED_ROLES.len()],
                given_name,
                family_name,
            }
        })
        .collect()
}

/// Seeds users and returns `(id, role)` for each inserted row.
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<(i64, String)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);
    let inserted = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        inserted.len(),
        start_time.elapsed()
    );

    Ok(inserted)
}

pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<(i64, String)>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 1000;
    let mut inserted = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        inserted.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<(i64, String)>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (username, email, password_hash, role, given_name, family_name) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING id, role");

    let mut q = sqlx::query_as::<_, (i64, String)>(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.given_name)
            .bind(&user.family_name);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Deletes seeded users. Their articles are removed first so they do not
/// linger as orphans once `author_id` is nulled.
pub async fn clear_users(db: &PgPool) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users and their articles...");

    let pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let mut tx = db.begin().await?;

    let articles = sqlx::query(
        "DELETE FROM articles a USING users u WHERE a.author_id = u.id AND u.email LIKE $1",
    )
    .bind(&pattern)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let users = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(&pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} users and {} articles in {:?}",
        users,
        articles,
        start_time.elapsed()
    );

    Ok((users, articles))
}
