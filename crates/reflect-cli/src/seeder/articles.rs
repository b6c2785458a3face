use fake::Fake;
use fake::faker::lorem::en::{Paragraphs, Sentence};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::ArticleSeed;

/// Generates articles round-robin over the given authors and categories.
///
/// Returns nothing when there are no authors to attribute articles to.
pub fn generate_articles(
    count: usize,
    author_ids: &[i64],
    category_ids: &[i64],
) -> Vec<ArticleSeed> {
    if author_ids.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let title: String = Sentence(3..8).fake();
            let paragraphs: Vec<String> = Paragraphs(2..5).fake();

            ArticleSeed {
                title: title.trim_end_matches('.').to_string(),
                content: paragraphs.join("\n\n"),
                author_id: author_ids[idx % author_ids.len()],
                category_id: (!category_ids.is_empty())
                    .then(|| category_ids[idx % category_ids.len()]),
            }
        })
        .collect()
}

pub async fn seed_articles(
    db: &PgPool,
    count: usize,
    author_ids: &[i64],
    category_ids: &[i64],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    if author_ids.is_empty() {
        println!("⚠️  No authors available, skipping articles");
        return Ok(0);
    }

    println!(
        "📝 Seeding {} articles across {} authors...",
        count,
        author_ids.len()
    );

    let articles = generate_articles(count, author_ids, category_ids);

    let mut tx = db.begin().await?;
    // 4 params per article
    const BATCH_SIZE: usize = 1000;
    let mut inserted = 0;
    for chunk in articles.chunks(BATCH_SIZE) {
        inserted += insert_articles_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} articles in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_articles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    articles: &[ArticleSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if articles.is_empty() {
        return Ok(0);
    }

    let mut query =
        String::from("INSERT INTO articles (title, content, author_id, category_id) VALUES ");
    for i in 0..articles.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!("(${}, ${}, ${}, ${})", p + 1, p + 2, p + 3, p + 4));
    }

    let mut q = sqlx::query(&query);
    for article in articles {
        q = q
            .bind(&article.title)
            .bind(&article.content)
            .bind(article.author_id)
            .bind(article.category_id);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}
