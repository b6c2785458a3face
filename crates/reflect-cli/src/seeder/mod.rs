//! Database seeding for development and load testing.
//!
//! Fake rows are generated in parallel with rayon and inserted with
//! multi-value `INSERT` statements inside one transaction per table.
//! Seeded users share [`SEED_EMAIL_DOMAIN`], which [`clear_all`] uses to
//! remove them again without touching real accounts.

mod articles;
mod categories;
mod models;
mod users;

pub use articles::{generate_articles, seed_articles};
pub use categories::{generate_categories, seed_categories};
pub use models::{SEED_EMAIL_DOMAIN, SEED_PASSWORD, SeedConfig};
pub use users::{clear_users, generate_users, seed_users};

use reflect_auth::roles;
use reflect_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub articles: u64,
}

/// Seeds users, then categories, then articles written by the seeded
/// authors.
pub async fn seed_all(
    db: &PgPool,
    config: SeedConfig,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Starting database seeding...");
    println!(
        "   - Users: {}, categories: {}, articles: {}",
        config.users, config.categories, config.articles
    );

    // One hash for every seeded user
    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let users = seed_users(db, config.users, &password_hash).await?;
    let author_ids: Vec<i64> = users
        .iter()
        .filter(|(_, role)| role == roles::AUTHOR)
        .map(|(id, _)| *id)
        .collect();

    let category_ids = seed_categories(db, config.categories).await?;
    let articles = seed_articles(db, config.articles, &author_ids, &category_ids).await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Seeded users log in with password: {}", SEED_PASSWORD);

    Ok(SeedSummary {
        users: users.len(),
        categories: category_ids.len(),
        articles,
    })
}

/// Removes seeded users and their articles. Categories are kept since
/// real articles may reference them.
pub async fn clear_all(db: &PgPool) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    clear_users(db).await
}
