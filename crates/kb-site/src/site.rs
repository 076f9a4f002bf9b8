//! Knowledge base assembly.

use std::sync::Arc;

use kb_github::{ContentClient, FileEntry, EntryKind, Repository, file_name, parent_path};
use kb_naming::{DuplicateSuffixNormalizer, SlugNormalizer, parse_name, strip_order_prefix};
use kb_renderer::{RenderedArticle, parse_document, render_article};
use rayon::prelude::*;

use crate::error::SiteError;
use crate::model::{Article, Category};
use crate::overrides::{TitleOverride, default_title_overrides, resolve_category_title};

/// Article id of the repository README.
pub const README_ID: &str = "readme";

/// Builds the category tree from repository content.
///
/// Every call goes through the [`ContentClient`], so repeated calls within
/// the cache TTL do not hit the upstream again.
///
/// # Thread Safety
///
/// Articles of a category are fetched in parallel on the global rayon pool.
/// A failing article or category is logged and left out; only a failure of
/// the top-level listing is returned to the caller.
pub struct KnowledgeBase {
    client: ContentClient,
    repository: Repository,
    title_overrides: Vec<TitleOverride>,
    normalizer: Arc<dyn SlugNormalizer>,
}

impl KnowledgeBase {
    /// Create a knowledge base with the default title overrides and
    /// duplicate-suffix normalization.
    #[must_use]
    pub fn new(client: ContentClient, repository: Repository) -> Self {
        Self {
            client,
            repository,
            title_overrides: default_title_overrides(),
            normalizer: Arc::new(DuplicateSuffixNormalizer),
        }
    }

    /// Replace the category title override table.
    #[must_use]
    pub fn with_title_overrides(mut self, overrides: Vec<TitleOverride>) -> Self {
        self.title_overrides = overrides;
        self
    }

    /// Replace the article slug normalizer.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Arc<dyn SlugNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// All categories sorted by order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] if the content root cannot be listed and
    /// no fallback applies.
    pub fn all_categories(&self) -> Result<Vec<Category>, SiteError> {
        let root = self.client.content_root();
        let structure = self.client.repository_structure(root)?;

        let mut categories: Vec<Category> = structure
            .iter()
            .filter(|entry| entry.kind == EntryKind::Dir)
            .filter_map(|dir| match self.build_category(dir) {
                Ok(category) => Some(category),
                Err(e) => {
                    tracing::error!(path = %dir.path, error = %e, "Skipping category");
                    None
                }
            })
            .collect();

        categories.sort_by_key(|c| c.order);
        tracing::info!(count = categories.len(), "Assembled categories");
        Ok(categories)
    }

    /// Articles of one category directory, main page included, sorted by
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] if the directory cannot be listed.
    pub fn category_articles(&self, dir_name: &str) -> Result<Vec<Article>, SiteError> {
        let path = format!("{}/{dir_name}", self.client.content_root());
        let files = self.client.repository_structure(&path)?;

        let markdown: Vec<&FileEntry> = files.iter().filter(|f| f.is_markdown_file()).collect();
        let results: Vec<(&FileEntry, Result<Article, SiteError>)> = markdown
            .par_iter()
            .map(|file| (*file, self.article(&file.path)))
            .collect();

        let mut articles: Vec<Article> = results
            .into_iter()
            .filter_map(|(file, result)| {
                result
                    .inspect_err(|e| tracing::error!(path = %file.path, error = %e, "Skipping article"))
                    .ok()
            })
            .collect();

        articles.sort_by_key(|a| a.order);
        Ok(articles)
    }

    /// Load a single article by repository path.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Fetch`] if the file cannot be fetched and
    /// [`SiteError::Frontmatter`] if its frontmatter is malformed.
    pub fn article(&self, path: &str) -> Result<Article, SiteError> {
        let raw = self.client.file_content(path)?;
        let document = parse_document(&raw)?;
        let parts = parse_name(file_name(path));

        Ok(Article {
            id: self.normalizer.normalize(&parts.slug).into_owned(),
            title: document.title,
            content: document.content,
            path: path.to_owned(),
            category: file_name(parent_path(path)).to_owned(),
            is_main_page: parts.is_main_page,
            order: parts.order,
            edit_url: self.repository.edit_url(path),
        })
    }

    /// The repository README as an article, or `None` if it cannot be loaded.
    #[must_use]
    pub fn main_readme(&self) -> Option<Article> {
        let path = self.client.readme_path();
        let load = || -> Result<Article, SiteError> {
            let raw = self.client.file_content(path)?;
            let document = parse_document(&raw)?;
            Ok(Article {
                id: README_ID.to_owned(),
                title: document.title,
                content: document.content,
                path: path.to_owned(),
                category: String::new(),
                is_main_page: true,
                order: 0,
                edit_url: self.repository.edit_url(path),
            })
        };

        load()
            .inspect_err(|e| tracing::error!(path = %path, error = %e, "Failed to load README"))
            .ok()
    }

    /// Render an article's markdown to HTML and a table of contents.
    #[must_use]
    pub fn render(&self, article: &Article) -> RenderedArticle {
        render_article(&article.content)
    }

    fn build_category(&self, dir: &FileEntry) -> Result<Category, SiteError> {
        let articles = self.category_articles(&dir.name)?;
        let (main_page, articles) = split_main_page(articles);

        let id = strip_order_prefix(&dir.name).to_owned();
        let main_title = main_page.as_ref().map(|a| a.title.as_str());
        let title = resolve_category_title(&self.title_overrides, &id, main_title);

        Ok(Category {
            title,
            order: parse_name(&dir.name).order,
            id,
            name: dir.name.clone(),
            path: dir.path.clone(),
            main_page,
            articles,
        })
    }
}

/// Separate the first main page from the regular articles.
///
/// Further main pages are dropped so a category has at most one.
fn split_main_page(articles: Vec<Article>) -> (Option<Article>, Vec<Article>) {
    let mut main_page = None;
    let mut regular = Vec::with_capacity(articles.len());
    for article in articles {
        if !article.is_main_page {
            regular.push(article);
        } else if main_page.is_none() {
            main_page = Some(article);
        } else {
            tracing::warn!(path = %article.path, "Ignoring additional main page");
        }
    }
    (main_page, regular)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kb_cache::{Clock, ManualClock, MemoryCache, NullCache};
    use kb_github::{ContentSource, MockFailure, MockSource};
    use kb_naming::IdentityNormalizer;
    use pretty_assertions::assert_eq;

    use super::*;

    fn repository() -> Repository {
        Repository::new("FrontendKnowledgeBase", "FrontendCompetencies", "main")
    }

    fn knowledge_base(source: &Arc<MockSource>) -> KnowledgeBase {
        let client = ContentClient::new(
            Arc::clone(source) as Arc<dyn ContentSource>,
            Arc::new(NullCache),
        );
        KnowledgeBase::new(client, repository())
    }

    fn sample() -> Arc<MockSource> {
        Arc::new(
            MockSource::new()
                .with_file("README.md", "---\ntitle: ignored\n---\n# Frontend KB\n\nWelcome")
                .with_file("articles/2_javascript/2_closures.md", "# Замыкания")
                .with_file("articles/2_javascript/1_types.md", "# Типы данных")
                .with_file("articles/1_html_css/0_html_css.md", "# HTML и CSS")
                .with_file("articles/1_html_css/1_selectors.md", "# Селекторы")
                .with_file("articles/1_html_css/notes.txt", "not markdown")
                .with_file("articles/9_networking/0_networking.md", "# Браузер")
                .with_dir("articles/3_react"),
        )
    }

    fn ids(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_article_fields() {
        let kb = knowledge_base(&sample());
        let article = kb.article("articles/1_html_css/1_selectors.md").unwrap();
        assert_eq!(
            article,
            Article {
                id: "selectors".to_owned(),
                title: "Селекторы".to_owned(),
                content: "# Селекторы".to_owned(),
                path: "articles/1_html_css/1_selectors.md".to_owned(),
                category: "1_html_css".to_owned(),
                is_main_page: false,
                order: 1,
                edit_url: "https://github.com/FrontendKnowledgeBase/FrontendCompetencies/edit/main/articles/1_html_css/1_selectors.md".to_owned(),
            }
        );
    }

    #[test]
    fn test_article_duplicate_suffix_ids() {
        let source = Arc::new(
            MockSource::new()
                .with_file("articles/3_react/3_hooks copy.md", "# Hooks")
                .with_file("articles/3_react/4_hooks (1).md", "# Hooks again"),
        );
        let kb = knowledge_base(&source);
        assert_eq!(kb.article("articles/3_react/3_hooks copy.md").unwrap().id, "hooks");
        assert_eq!(kb.article("articles/3_react/4_hooks (1).md").unwrap().id, "hooks");
    }

    #[test]
    fn test_identity_normalizer_keeps_suffix() {
        let source = Arc::new(MockSource::new().with_file("articles/3_react/3_hooks copy.md", "# H"));
        let kb = knowledge_base(&source).with_normalizer(Arc::new(IdentityNormalizer));
        assert_eq!(kb.article("articles/3_react/3_hooks copy.md").unwrap().id, "hooks copy");
    }

    #[test]
    fn test_article_malformed_frontmatter() {
        let source = Arc::new(MockSource::new().with_file("articles/x/1_bad.md", "---\na: [\n---\n"));
        let kb = knowledge_base(&source);
        assert!(matches!(
            kb.article("articles/x/1_bad.md"),
            Err(SiteError::Frontmatter(_))
        ));
    }

    #[test]
    fn test_category_articles_sorted_and_filtered() {
        let kb = knowledge_base(&sample());
        let articles = kb.category_articles("2_javascript").unwrap();
        assert_eq!(ids(&articles), ["types", "closures"]);

        let html_css = kb.category_articles("1_html_css").unwrap();
        assert_eq!(ids(&html_css), ["html_css", "selectors"]);
    }

    #[test]
    fn test_category_articles_stable_for_equal_order() {
        let source = Arc::new(
            MockSource::new()
                .with_file("articles/x/b.md", "# B")
                .with_file("articles/x/a.md", "# A")
                .with_file("articles/x/1_first.md", "# First"),
        );
        let kb = knowledge_base(&source);
        assert_eq!(ids(&kb.category_articles("x").unwrap()), ["first", "b", "a"]);
    }

    #[test]
    fn test_failing_article_is_skipped() {
        let source = Arc::new(
            MockSource::new()
                .with_file("articles/x/1_ok.md", "# Ok")
                .with_file("articles/x/2_broken.md", "# Broken")
                .with_failing_path("articles/x/2_broken.md"),
        );
        let kb = knowledge_base(&source);
        assert_eq!(ids(&kb.category_articles("x").unwrap()), ["ok"]);
    }

    #[test]
    fn test_all_categories() {
        let kb = knowledge_base(&sample());
        let categories = kb.all_categories().unwrap();

        let summary: Vec<(&str, &str, u32)> = categories
            .iter()
            .map(|c| (c.id.as_str(), c.title.as_str(), c.order))
            .collect();
        assert_eq!(
            summary,
            [
                ("html_css", "HTML и CSS", 1),
                ("javascript", "Javascript", 2),
                ("react", "React", 3),
                ("networking", "Сетевые технологии", 9),
            ]
        );
    }

    #[test]
    fn test_main_page_excluded_from_articles() {
        let kb = knowledge_base(&sample());
        let categories = kb.all_categories().unwrap();
        let html_css = &categories[0];

        assert_eq!(html_css.main_page.as_ref().map(|a| a.id.as_str()), Some("html_css"));
        assert_eq!(ids(&html_css.articles), ["selectors"]);
        assert!(html_css.articles.iter().all(|a| !a.is_main_page));
    }

    #[test]
    fn test_failing_category_is_skipped() {
        let source = Arc::new(
            MockSource::new()
                .with_file("articles/1_ok/1_a.md", "# A")
                .with_dir("articles/2_broken")
                .with_failing_path("articles/2_broken"),
        );
        let kb = knowledge_base(&source);
        let categories = kb.all_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, "ok");
    }

    #[test]
    fn test_root_listing_failure_is_fatal() {
        let source = sample();
        source.set_failure(Some(MockFailure::Unavailable));
        let kb = knowledge_base(&source);
        assert!(matches!(kb.all_categories(), Err(SiteError::Fetch(_))));
    }

    #[test]
    fn test_rate_limited_empty_cache_uses_fallback() {
        let source = sample();
        source.set_failure(Some(MockFailure::RateLimited));
        let kb = knowledge_base(&source);

        let categories = kb.all_categories().unwrap();
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Html Css", "Javascript", "React"]);
        assert!(categories.iter().all(|c| c.path.starts_with("articles/")));
    }

    #[test]
    fn test_rate_limit_after_warm_cache_serves_stale_tree() {
        let source = sample();
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(300), Arc::clone(&clock) as Arc<dyn Clock>);
        let client = ContentClient::new(Arc::clone(&source) as Arc<dyn ContentSource>, Arc::new(cache));
        let kb = KnowledgeBase::new(client, repository());

        let warm = kb.all_categories().unwrap();
        let calls = source.total_calls();

        let again = kb.all_categories().unwrap();
        assert_eq!(source.total_calls(), calls);

        clock.advance(Duration::from_secs(600));
        source.set_failure(Some(MockFailure::RateLimited));
        let stale = kb.all_categories().unwrap();

        assert_eq!(again, warm);
        assert_eq!(stale, warm);
    }

    #[test]
    fn test_main_readme() {
        let kb = knowledge_base(&sample());
        let readme = kb.main_readme().unwrap();
        assert_eq!(readme.id, README_ID);
        assert_eq!(readme.title, "Frontend KB");
        assert_eq!(readme.category, "");
        assert!(readme.is_main_page);
        assert_eq!(readme.order, 0);
        assert_eq!(readme.content, "# Frontend KB\n\nWelcome");
    }

    #[test]
    fn test_main_readme_missing_is_none() {
        let kb = knowledge_base(&Arc::new(MockSource::new()));
        assert!(kb.main_readme().is_none());
    }

    #[test]
    fn test_render_article() {
        let kb = knowledge_base(&sample());
        let article = kb.article("articles/1_html_css/0_html_css.md").unwrap();
        let rendered = kb.render(&article);
        assert!(!rendered.html.contains("<h1"));
    }

    #[test]
    fn test_split_main_page_keeps_first() {
        let make = |id: &str, main: bool| Article {
            id: id.to_owned(),
            title: id.to_owned(),
            content: String::new(),
            path: id.to_owned(),
            category: String::new(),
            is_main_page: main,
            order: 0,
            edit_url: String::new(),
        };
        let (main, rest) = split_main_page(vec![make("a", true), make("b", false), make("c", true)]);
        assert_eq!(main.map(|a| a.id), Some("a".to_owned()));
        assert_eq!(ids(&rest), ["b"]);
    }
}
