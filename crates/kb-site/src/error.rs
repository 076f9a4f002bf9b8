//! Error types for site assembly.

use kb_github::FetchError;
use kb_renderer::FrontmatterError;

/// Error returned when building or querying the knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Upstream content could not be fetched.
    #[error("{0}")]
    Fetch(#[from] FetchError),
    /// Article frontmatter is malformed.
    #[error("{0}")]
    Frontmatter(#[from] FrontmatterError),
    /// No category with this id.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    /// No article with this id in the category.
    #[error("Article not found: {category}/{article}")]
    ArticleNotFound { category: String, article: String },
}

impl SiteError {
    /// Whether the error means the requested content does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound(_) | Self::ArticleNotFound { .. } | Self::Fetch(FetchError::NotFound(_))
        )
    }
}
