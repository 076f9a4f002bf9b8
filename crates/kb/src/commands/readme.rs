//! `kb readme` command implementation.

use clap::Args;

use super::{SourceArgs, print_json};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the readme command.
#[derive(Args)]
pub(crate) struct ReadmeArgs {
    /// Print the rendered README as JSON.
    #[arg(long)]
    json: bool,
}

impl ReadmeArgs {
    pub(crate) fn execute(self, source: &SourceArgs, output: &Output) -> Result<(), CliError> {
        let kb = source.knowledge_base()?;
        let readme = kb
            .main_readme()
            .ok_or_else(|| CliError::NotFound("README could not be loaded".to_owned()))?;
        let rendered = kb.render(&readme);

        if self.json {
            return print_json(output, &rendered);
        }

        output.heading(&readme.title)?;
        output.print(&rendered.html)?;
        Ok(())
    }
}
