use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Used for new articles that do not name a category
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category block embedded in article responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub is_default: bool,
}

/// Payload for both create and whole-record update.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CategoryDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Engineering")]
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}
