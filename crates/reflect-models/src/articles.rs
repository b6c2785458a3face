//! Article data models and DTOs.
//!
//! Articles are read through a single joined query, so [`ArticleRow`] holds
//! the article columns plus the nullable author and category columns.
//! [`ArticleDetails`] is the API shape built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::categories::CategorySummary;
use crate::users::UserSummary;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub date: DateTime<Utc>,
    /// Null once the author has been deleted
    pub author_id: Option<i64>,
    /// Null once the category has been deleted
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article joined with its author and category.
#[derive(FromRow, Debug, Clone)]
pub struct ArticleRow {
    #[sqlx(flatten)]
    pub article: Article,
    pub category_name: Option<String>,
    pub category_is_default: Option<bool>,
    pub author_username: Option<String>,
    pub author_email: Option<String>,
    pub author_given_name: Option<String>,
    pub author_family_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ArticleDetails {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub date: DateTime<Utc>,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub author: Option<UserSummary>,
    pub category: Option<CategorySummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for ArticleDetails {
    fn from(row: ArticleRow) -> Self {
        let ArticleRow {
            article,
            category_name,
            category_is_default,
            author_username,
            author_email,
            author_given_name,
            author_family_name,
        } = row;

        let author = match (
            article.author_id,
            author_username,
            author_email,
            author_given_name,
            author_family_name,
        ) {
            (Some(id), Some(username), Some(email), Some(given_name), Some(family_name)) => {
                Some(UserSummary {
                    id,
                    username,
                    email,
                    given_name,
                    family_name,
                })
            }
            _ => None,
        };

        let category = match (article.category_id, category_name) {
            (Some(id), Some(name)) => Some(CategorySummary {
                id,
                name,
                is_default: category_is_default.unwrap_or(false),
            }),
            _ => None,
        };

        Self {
            id: article.id,
            title: article.title,
            content: article.content,
            image_url: article.image_url,
            date: article.date,
            author_id: article.author_id,
            category_id: article.category_id,
            author,
            category,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// New article payload. The author is always the caller.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateArticleDto {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    #[schema(example = "Hello, world")]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Defaults to the time of creation
    pub date: Option<DateTime<Utc>>,
    /// Defaults to the category flagged `is_default`
    pub category_id: Option<i64>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

/// Whole-record replace of an article.
///
/// `image_url` and `category_id` are cleared when omitted. An omitted `date`
/// keeps the stored one.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateArticleDto {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ImageUploadResponse {
    #[schema(example = "/uploads/articles/3f0c4b2e-0d5e-4e4b-9a51-2f1f3c1d7a10.png")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(author_id: Option<i64>, category_id: Option<i64>) -> Article {
        let now = Utc::now();
        Article {
            id: 7,
            title: "Title".to_string(),
            content: "Body".to_string(),
            image_url: None,
            date: now,
            author_id,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_details_from_fully_joined_row() {
        let row = ArticleRow {
            article: article(Some(3), Some(4)),
            category_name: Some("News".to_string()),
            category_is_default: Some(true),
            author_username: Some("ada".to_string()),
            author_email: Some("ada@example.com".to_string()),
            author_given_name: Some("Ada".to_string()),
            author_family_name: Some("Lovelace".to_string()),
        };

        let details = ArticleDetails::from(row);
        let author = details.author.unwrap();
        assert_eq!(author.id, 3);
        assert_eq!(author.username, "ada");
        let category = details.category.unwrap();
        assert_eq!(category.id, 4);
        assert!(category.is_default);
    }

    #[test]
    fn test_details_from_orphaned_row() {
        let row = ArticleRow {
            article: article(None, None),
            category_name: None,
            category_is_default: None,
            author_username: None,
            author_email: None,
            author_given_name: None,
            author_family_name: None,
        };

        let details = ArticleDetails::from(row);
        assert!(details.author.is_none());
        assert!(details.category.is_none());
        assert_eq!(details.id, 7);
    }

    #[test]
    fn test_create_article_dto_requires_title() {
        let dto: CreateArticleDto =
            serde_json::from_str(r#"{"title":"","content":"Body"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_article_dto_optional_fields() {
        let dto: CreateArticleDto =
            serde_json::from_str(r#"{"title":"Hi","content":"Body"}"#).unwrap();
        assert!(dto.date.is_none());
        assert!(dto.category_id.is_none());
        assert!(dto.image_url.is_none());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_invalid_image_url_rejected() {
        let dto: CreateArticleDto = serde_json::from_str(
            r#"{"title":"Hi","content":"Body","image_url":"not a url"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
