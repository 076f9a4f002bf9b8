//! `kb categories` command implementation.

use clap::Args;
use kb_site::{Category, category_route, navigation_tree};

use super::{SourceArgs, print_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the categories command.
#[derive(Args)]
pub(crate) struct CategoriesArgs {
    /// Print the navigation tree as JSON.
    #[arg(long)]
    json: bool,
}

impl CategoriesArgs {
    pub(crate) fn execute(self, source: &SourceArgs, output: &Output) -> Result<(), CliError> {
        let kb = source.knowledge_base()?;
        let categories = kb.all_categories()?;

        if self.json {
            return print_json(output, &navigation_tree(&categories));
        }

        if categories.is_empty() {
            output.warning("No categories found.");
            return Ok(());
        }
        for category in &categories {
            print_category(output, category)?;
        }
        Ok(())
    }
}

fn print_category(output: &Output, category: &Category) -> Result<(), CliError> {
    output.heading(&format!(
        "{} ({}, {} articles)",
        category.title,
        category_route(&category.id),
        category.article_count()
    ))?;
    if let Some(main) = &category.main_page {
        output.detail(&format!("  * {}", main.title))?;
    }
    for article in &category.articles {
        output.print(&format!("  {:>3}. {} [{}]", article.order, article.title, article.id))?;
    }
    Ok(())
}
