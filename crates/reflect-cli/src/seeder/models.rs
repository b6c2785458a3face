//! Seed rows and the knobs that control how many are generated.

/// Every seeded user gets an address in this domain, which is how
/// `clear-seed` finds them again.
pub const SEED_EMAIL_DOMAIN: &str = "seed.reflect.dev";

/// Password shared by all seeded users.
pub const SEED_PASSWORD: &str = "password123";

pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
    pub given_name: String,
    pub family_name: String,
}

pub struct CategorySeed {
    pub name: String,
}

pub struct ArticleSeed {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SeedConfig {
    pub users: usize,
    pub categories: usize,
    pub articles: usize,
}

impl SeedConfig {
    pub fn new(users: usize, categories: usize, articles: usize) -> Self {
        Self {
            users,
            categories,
            articles,
        }
    }
}
