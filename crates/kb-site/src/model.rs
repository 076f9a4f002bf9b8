//! Category and article model.
//!
//! Both types serialize with camelCase keys for the UI layer.

use serde::Serialize;

/// A markdown document from the content repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Slug from the file name.
    pub id: String,
    pub title: String,
    /// Markdown body, frontmatter removed.
    pub content: String,
    /// Path in the repository.
    pub path: String,
    /// Raw name of the owning directory.
    pub category: String,
    pub is_main_page: bool,
    pub order: u32,
    pub edit_url: String,
}

/// A content directory with its articles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Directory name without order prefix.
    pub id: String,
    /// Raw directory name.
    pub name: String,
    pub title: String,
    /// Directory path in the repository.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_page: Option<Article>,
    /// Regular articles sorted by order. Never contains the main page.
    pub articles: Vec<Article>,
    pub order: u32,
}

impl Category {
    /// Number of articles including the main page.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.articles.len() + usize::from(self.main_page.is_some())
    }

    /// Regular article with the given id.
    #[must_use]
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }
}

/// Kind of a search or navigation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Category,
    Article,
}

/// Route of a category page.
#[must_use]
pub fn category_route(category_id: &str) -> String {
    format!("/{category_id}")
}

/// Route of an article page.
#[must_use]
pub fn article_route(category_id: &str, article_id: &str) -> String {
    format!("/{category_id}/{article_id}")
}
