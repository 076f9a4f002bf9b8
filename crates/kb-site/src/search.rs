//! Title search over categories and articles.

use serde::Serialize;

use crate::model::{Category, EntryType, article_route, category_route};

/// Maximum number of results returned by [`SearchIndex::search`].
pub const MAX_RESULTS: usize = 10;

/// A search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    /// Route of the page to open.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Title of the owning category, for articles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Searchable entries built from a category tree.
///
/// Each category contributes itself, its main page and its regular
/// articles, in that order.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
    entries: Vec<IndexedEntry>,
}

#[derive(Clone, Debug)]
struct IndexedEntry {
    result: SearchResult,
    title_lower: String,
    category_lower: Option<String>,
}

impl IndexedEntry {
    fn new(result: SearchResult) -> Self {
        Self {
            title_lower: result.title.to_lowercase(),
            category_lower: result.category.as_deref().map(str::to_lowercase),
            result,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.title_lower.contains(query)
            || self
                .category_lower
                .as_deref()
                .is_some_and(|c| c.contains(query))
    }
}

impl SearchIndex {
    #[must_use]
    pub fn build(categories: &[Category]) -> Self {
        let mut entries = Vec::new();
        for category in categories {
            entries.push(IndexedEntry::new(SearchResult {
                id: category.id.clone(),
                title: category.title.clone(),
                path: category_route(&category.id),
                kind: EntryType::Category,
                category: None,
            }));

            if let Some(main) = &category.main_page {
                entries.push(IndexedEntry::new(SearchResult {
                    id: format!("{}-main", category.id),
                    title: main.title.clone(),
                    path: category_route(&category.id),
                    kind: EntryType::Article,
                    category: Some(category.title.clone()),
                }));
            }

            for article in &category.articles {
                entries.push(IndexedEntry::new(SearchResult {
                    id: format!("{}-{}", category.id, article.id),
                    title: article.title.clone(),
                    path: article_route(&category.id, &article.id),
                    kind: EntryType::Article,
                    category: Some(category.title.clone()),
                }));
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring match on titles and category titles.
    ///
    /// A blank query yields no results.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.matches(&query))
            .take(MAX_RESULTS)
            .map(|entry| entry.result.clone())
            .collect()
    }
}
