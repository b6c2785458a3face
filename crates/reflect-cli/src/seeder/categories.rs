use fake::Fake;
use fake::faker::lorem::en::Word;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::CategorySeed;

/// Category names carry their index so they never collide with each other.
pub fn generate_categories(count: usize) -> Vec<CategorySeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let word: String = Word().fake();
            let mut chars = word.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::from("Category"),
            };
            CategorySeed {
                name: format!("{} {}", capitalized, idx + 1),
            }
        })
        .collect()
}

/// Seeds categories, skipping names that already exist, and returns every
/// id inserted.
pub async fn seed_categories(
    db: &PgPool,
    count: usize,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏷️  Seeding {} categories...", count);

    let categories = generate_categories(count);
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO categories (name) VALUES ");
    for i in 0..categories.len() {
        if i > 0 {
            query.push_str(", ");
        }
        query.push_str(&format!("(${})", i + 1));
    }
    query.push_str(" ON CONFLICT (name) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for category in &categories {
        q = q.bind(&category.name);
    }
    let ids = q.fetch_all(db).await?;

    println!(
        "   ✓ Inserted {} categories in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}
