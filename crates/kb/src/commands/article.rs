//! `kb article` command implementation.

use clap::Args;
use kb_site::{Article, RenderedArticle, find_category, resolve_article};
use serde::Serialize;

use super::{SourceArgs, print_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the article command.
#[derive(Args)]
pub(crate) struct ArticleArgs {
    /// Category id (directory name without order prefix).
    category: String,

    /// Article id. Shows the category main page when omitted.
    article: Option<String>,

    /// Print article, HTML and table of contents as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleView<'a> {
    article: &'a Article,
    #[serde(flatten)]
    rendered: RenderedArticle,
    previous: Option<&'a str>,
    next: Option<&'a str>,
}

impl ArticleArgs {
    pub(crate) fn execute(self, source: &SourceArgs, output: &Output) -> Result<(), CliError> {
        let kb = source.knowledge_base()?;
        let categories = kb.all_categories()?;

        let (article, previous, next) = match &self.article {
            Some(id) => {
                let page = resolve_article(&categories, &self.category, id)?;
                (page.article, page.previous, page.next)
            }
            None => {
                let category = find_category(&categories, &self.category).ok_or_else(|| {
                    CliError::NotFound(format!("Category not found: {}", self.category))
                })?;
                let main = category.main_page.as_ref().ok_or_else(|| {
                    CliError::NotFound(format!("Category {} has no main page", self.category))
                })?;
                (main, None, None)
            }
        };

        let view = ArticleView {
            article,
            rendered: kb.render(article),
            previous: previous.map(|a| a.id.as_str()),
            next: next.map(|a| a.id.as_str()),
        };

        if self.json {
            return print_json(output, &view);
        }

        output.heading(&view.article.title)?;
        output.detail(&view.article.edit_url)?;
        for item in &view.rendered.toc {
            let indent = "  ".repeat(usize::from(item.level.saturating_sub(1)));
            output.detail(&format!("{indent}- {} (#{})", item.title, item.anchor))?;
        }
        output.print("")?;
        output.print(&view.rendered.html)?;
        Ok(())
    }
}
