//! Knowledge base site model for KB.
//!
//! Turns repository content into the structures the pages need:
//!
//! - [`KnowledgeBase`]: Builds categories and articles through a [`ContentClient`]
//! - [`resolve_article`] and [`navigation_tree`]: Route lookup and sidebar
//! - [`SearchIndex`]: Case-insensitive title search
//!
//! File names follow the ordering convention of [`kb_naming`], which is
//! re-exported here.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use kb_cache::NullCache;
//! use kb_github::{ContentClient, ContentSource, MockSource, Repository};
//! use kb_site::{KnowledgeBase, SearchIndex};
//!
//! let source = MockSource::new().with_file("articles/1_react/1_hooks.md", "# Хуки");
//! let client = ContentClient::new(Arc::new(source), Arc::new(NullCache));
//! let kb = KnowledgeBase::new(client, Repository::new("owner", "repo", "main"));
//!
//! let categories = kb.all_categories()?;
//! let hits = SearchIndex::build(&categories).search("хук");
//! assert_eq!(hits[0].path, "/react/hooks");
//! ```
//!
//! [`ContentClient`]: kb_github::ContentClient

mod error;
mod model;
mod navigation;
mod overrides;
mod search;
mod site;

pub use error::SiteError;
pub use kb_naming::{
    DEFAULT_ORDER, DuplicateSuffixNormalizer, IdentityNormalizer, NameParts, SlugNormalizer,
    display_title, parse_name, strip_order_prefix, title_case,
};
pub use kb_renderer::{RenderedArticle, TocItem};
pub use model::{Article, Category, EntryType, article_route, category_route};
pub use navigation::{ArticlePage, NavigationItem, find_category, navigation_tree, resolve_article};
pub use overrides::{TitleOverride, default_title_overrides, resolve_category_title};
pub use search::{MAX_RESULTS, SearchIndex, SearchResult};
pub use site::{KnowledgeBase, README_ID};
