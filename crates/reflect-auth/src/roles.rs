//! Role names stored in `users.role`.
//!
//! Roles are free text; these are the values the API gives meaning to.
//! Comparison is exact and case-sensitive.

pub const ADMINISTRATOR: &str = "Administrator";
pub const AUTHOR: &str = "Author";
pub const EDITOR: &str = "Editor";
/// Assigned to self-registered users.
pub const READER: &str = "Reader";

/// Roles allowed to write articles.
pub const ARTICLE_WRITERS: &[&str] = &[ADMINISTRATOR, AUTHOR];
