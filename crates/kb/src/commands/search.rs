//! `kb search` command implementation.

use clap::Args;
use kb_site::{EntryType, SearchIndex};

use super::{SourceArgs, print_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// Text to look for in titles.
    query: String,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    pub(crate) fn execute(self, source: &SourceArgs, output: &Output) -> Result<(), CliError> {
        let kb = source.knowledge_base()?;
        let index = SearchIndex::build(&kb.all_categories()?);
        let results = index.search(&self.query);

        if self.json {
            return print_json(output, &results);
        }

        if results.is_empty() {
            output.warning(&format!("No results for \"{}\".", self.query));
            return Ok(());
        }
        for result in &results {
            match (result.kind, &result.category) {
                (EntryType::Article, Some(category)) => {
                    output.print(&format!("{}  {} / {}", result.path, category, result.title))?;
                }
                _ => output.heading(&format!("{}  {}", result.path, result.title))?,
            }
        }
        Ok(())
    }
}
