//! CLI command implementations.

pub(crate) mod article;
pub(crate) mod categories;
pub(crate) mod readme;
pub(crate) mod search;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use kb_cache::MemoryCache;
use kb_config::{CliSettings, Config, TitleOverrideConfig};
use kb_github::{ContentClient, GithubSource, Repository};
use kb_site::{KnowledgeBase, TitleOverride};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use article::ArticleArgs;
pub(crate) use categories::CategoriesArgs;
pub(crate) use readme::ReadmeArgs;
pub(crate) use search::SearchArgs;

/// Options selecting the content repository, shared by all commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover kb.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Repository owner (overrides config).
    #[arg(long, env = "GITHUB_OWNER", global = true)]
    owner: Option<String>,

    /// Repository name (overrides config).
    #[arg(long, env = "GITHUB_REPO", global = true)]
    repo: Option<String>,

    /// Branch to read (overrides config).
    #[arg(long, env = "GITHUB_BRANCH", global = true)]
    branch: Option<String>,

    /// GitHub access token (overrides config).
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Enable verbose output (cache and fetch logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration and assemble the knowledge base.
    pub(crate) fn knowledge_base(&self) -> Result<KnowledgeBase, CliError> {
        let settings = CliSettings {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            token: self.token.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(build_knowledge_base(&config))
    }
}

fn build_knowledge_base(config: &Config) -> KnowledgeBase {
    let github = &config.github;
    let repository = Repository::new(&github.owner, &github.repo, &github.branch);
    let source = GithubSource::new(
        &github.api_url,
        repository.clone(),
        github.token().map(ToOwned::to_owned),
    );
    let cache = MemoryCache::new(config.content.cache_ttl());
    let client = ContentClient::new(Arc::new(source), Arc::new(cache))
        .with_content_root(config.content.root.as_str())
        .with_readme_path(config.content.readme.as_str());

    KnowledgeBase::new(client, repository)
        .with_title_overrides(title_overrides(&config.content.title_overrides))
}

fn title_overrides(entries: &[TitleOverrideConfig]) -> Vec<TitleOverride> {
    entries
        .iter()
        .map(|entry| TitleOverride {
            category: entry.category.clone(),
            title: entry.title.clone(),
            replaces: entry.replaces.clone(),
        })
        .collect()
}

/// Write a value as pretty JSON to stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(output: &Output, value: &T) -> Result<(), CliError> {
    output.print(&serde_json::to_string_pretty(value)?)?;
    Ok(())
}
