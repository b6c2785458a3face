//! Page-based pagination and search for list endpoints.
//!
//! Every list endpoint accepts the same query string:
//!
//! - `search`: optional free-text term, matched as a case-insensitive substring
//! - `page`: 1-indexed page number (default: 1)
//! - `page_size`: items per page, clamped to 1..=100 (default: 10).
//!   `pageSize` is accepted as an alias.
//!
//! Empty values (`?search=&page=`) are treated as absent.
//!
//! Responses are wrapped in [`PagedInfo`]:
//!
//! ```json
//! {
//!   "data": [...],
//!   "page": 2,
//!   "page_size": 10,
//!   "total_count": 37
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::{deserialize_optional_i64, deserialize_optional_string};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring to filter by
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(
        default,
        alias = "pageSize",
        deserialize_with = "deserialize_optional_i64"
    )]
    pub page_size: Option<i64>,
}

impl ListParams {
    /// Returns the effective page, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective page size, clamped to [1, 100].
    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows to skip: `(page - 1) * page_size`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// The trimmed search term, or `None` when it is blank.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// `ILIKE` pattern for the search term with `%`, `_` and `\` escaped.
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        self.search().map(|term| {
            let escaped = term
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{}%", escaped)
        })
    }

    /// Builds the response envelope for this request.
    pub fn paged<T>(&self, data: Vec<T>, total_count: i64) -> PagedInfo<T> {
        PagedInfo {
            data,
            page: self.page(),
            page_size: self.page_size(),
            total_count,
        }
    }
}

/// A page of results plus the information needed to fetch the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagedInfo<T> {
    pub data: Vec<T>,
    /// Page that was returned (1-indexed)
    pub page: i64,
    /// Page size that was applied
    pub page_size: i64,
    /// Number of records matching the search across all pages
    pub total_count: i64,
}
