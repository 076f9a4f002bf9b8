//! Category and article lookup for page routes.

use serde::Serialize;

use crate::error::SiteError;
use crate::model::{Article, Category, EntryType, article_route, category_route};

/// An article resolved from a route, with its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage<'a> {
    pub category: &'a Category,
    pub article: &'a Article,
    /// Preceding regular article. Always `None` for the main page.
    pub previous: Option<&'a Article>,
    /// Following regular article. Always `None` for the main page.
    pub next: Option<&'a Article>,
}

/// Category with the given id.
#[must_use]
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}

/// Resolve `/<category_id>/<article_id>`.
///
/// Regular articles are searched first, then the main page.
///
/// # Errors
///
/// Returns [`SiteError::CategoryNotFound`] or [`SiteError::ArticleNotFound`]
/// when either part does not match.
pub fn resolve_article<'a>(
    categories: &'a [Category],
    category_id: &str,
    article_id: &str,
) -> Result<ArticlePage<'a>, SiteError> {
    let category = find_category(categories, category_id)
        .ok_or_else(|| SiteError::CategoryNotFound(category_id.to_owned()))?;

    if let Some(index) = category.articles.iter().position(|a| a.id == article_id) {
        return Ok(ArticlePage {
            category,
            article: &category.articles[index],
            previous: index.checked_sub(1).map(|i| &category.articles[i]),
            next: category.articles.get(index + 1),
        });
    }

    match &category.main_page {
        Some(main) if main.id == article_id => Ok(ArticlePage {
            category,
            article: main,
            previous: None,
            next: None,
        }),
        _ => Err(SiteError::ArticleNotFound {
            category: category_id.to_owned(),
            article: article_id.to_owned(),
        }),
    }
}

/// Sidebar entry: a category with its regular articles as children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: String,
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_main_page: bool,
}

/// Build the sidebar tree. Main pages are reached through the category
/// entry and are not listed as children.
#[must_use]
pub fn navigation_tree(categories: &[Category]) -> Vec<NavigationItem> {
    categories
        .iter()
        .map(|category| NavigationItem {
            id: category.id.clone(),
            title: category.title.clone(),
            path: category_route(&category.id),
            kind: EntryType::Category,
            children: category
                .articles
                .iter()
                .map(|article| NavigationItem {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    path: article_route(&category.id, &article.id),
                    kind: EntryType::Article,
                    children: Vec::new(),
                    is_main_page: false,
                })
                .collect(),
            is_main_page: false,
        })
        .collect()
}
