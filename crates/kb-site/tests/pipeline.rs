use std::sync::Arc;
use std::time::Duration;

use kb_cache::{Clock, ManualClock, MemoryCache};
use kb_github::{ContentClient, ContentSource, MockFailure, MockSource, Repository};
use kb_site::{KnowledgeBase, SearchIndex, navigation_tree, resolve_article};
use pretty_assertions::assert_eq;

const TTL: Duration = Duration::from_secs(300);

fn source() -> Arc<MockSource> {
    Arc::new(
        MockSource::new()
            .with_file("README.md", "# Frontend Knowledge Base\n\nСтарт здесь.")
            .with_file(
                "articles/1_html_css/0_html_css.md",
                "# HTML и CSS\n\nОсновы вёрстки.\n\n## Разделы\n",
            )
            .with_file(
                "articles/1_html_css/1_selectors.md",
                "---\ntitle: Селекторы\n---\n## Базовые селекторы\n\n```css\na > b {}\n```\n\n## Specificity\n\nSee www.w3.org for details.\n",
            )
            .with_file("articles/1_html_css/2_flexbox copy.md", "# Flexbox\n"),
    )
}

fn knowledge_base(source: &Arc<MockSource>, clock: &Arc<ManualClock>) -> KnowledgeBase {
    let cache = MemoryCache::with_clock(TTL, Arc::clone(clock) as Arc<dyn Clock>);
    let client = ContentClient::new(Arc::clone(source) as Arc<dyn ContentSource>, Arc::new(cache));
    KnowledgeBase::new(client, Repository::new("owner", "kb", "main"))
}

#[test]
fn test_repository_to_rendered_page() {
    let source = source();
    let kb = knowledge_base(&source, &Arc::new(ManualClock::new()));

    let categories = kb.all_categories().unwrap();
    assert_eq!(categories.len(), 1);
    let category = &categories[0];
    assert_eq!(category.id, "html_css");
    assert_eq!(category.title, "HTML и CSS");

    let page = resolve_article(&categories, "html_css", "selectors").unwrap();
    assert_eq!(page.article.title, "Селекторы");
    assert_eq!(page.next.map(|a| a.id.as_str()), Some("flexbox"));
    assert_eq!(
        page.article.edit_url,
        "https://github.com/owner/kb/edit/main/articles/1_html_css/1_selectors.md"
    );

    let rendered = kb.render(page.article);
    assert!(rendered.html.contains(r#"<h2 id="базовые-селекторы">"#));
    assert!(rendered.html.contains("language-css"));
    assert!(rendered.html.contains(r#"href="http://www.w3.org""#));

    let anchors: Vec<&str> = rendered.toc.iter().map(|t| t.anchor.as_str()).collect();
    assert_eq!(anchors, ["базовые-селекторы", "specificity"]);
    for item in &rendered.toc {
        assert!(rendered.html.contains(&format!(r#"id="{}""#, item.anchor)));
    }

    let tree = navigation_tree(&categories);
    let children: Vec<&str> = tree[0].children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(children, ["Селекторы", "Flexbox"]);

    let hits = SearchIndex::build(&categories).search("flex");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "/html_css/flexbox");
}

#[test]
fn test_main_page_route() {
    let kb = knowledge_base(&source(), &Arc::new(ManualClock::new()));
    let categories = kb.all_categories().unwrap();

    let page = resolve_article(&categories, "html_css", "html_css").unwrap();
    assert!(page.article.is_main_page);
    let rendered = kb.render(page.article);
    assert!(rendered.html.contains("Основы вёрстки."));
}

#[test]
fn test_readme() {
    let kb = knowledge_base(&source(), &Arc::new(ManualClock::new()));
    let readme = kb.main_readme().unwrap();
    assert_eq!(readme.title, "Frontend Knowledge Base");
}

#[test]
fn test_stale_cache_survives_rate_limit() {
    let source = source();
    let clock = Arc::new(ManualClock::new());
    let kb = knowledge_base(&source, &clock);

    let warm = kb.all_categories().unwrap();
    clock.advance(TTL * 2);
    source.set_failure(Some(MockFailure::RateLimited));

    assert_eq!(kb.all_categories().unwrap(), warm);
}

#[test]
fn test_cold_rate_limit_serves_fallback() {
    let source = source();
    source.set_failure(Some(MockFailure::RateLimited));
    let kb = knowledge_base(&source, &Arc::new(ManualClock::new()));

    let categories = kb.all_categories().unwrap();
    let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["html_css", "javascript", "react"]);
    assert!(categories.iter().all(|c| c.articles.is_empty()));

    let readme = kb.main_readme().unwrap();
    assert!(!readme.content.is_empty());
}
