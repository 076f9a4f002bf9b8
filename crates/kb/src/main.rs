//! KB CLI - Frontend knowledge base browser.
//!
//! Provides commands for:
//! - `categories`: List categories and their articles
//! - `article`: Render an article to HTML with its table of contents
//! - `search`: Search titles
//! - `readme`: Render the repository README

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ArticleArgs, CategoriesArgs, ReadmeArgs, SearchArgs, SourceArgs};
use output::Output;

/// KB - Frontend knowledge base.
#[derive(Parser)]
#[command(name = "kb", version, about)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and their articles.
    Categories(CategoriesArgs),
    /// Render an article.
    Article(ArticleArgs),
    /// Search category and article titles.
    Search(SearchArgs),
    /// Render the repository README.
    Readme(ReadmeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.source.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Categories(args) => args.execute(&cli.source, &output),
        Commands::Article(args) => args.execute(&cli.source, &output),
        Commands::Search(args) => args.execute(&cli.source, &output),
        Commands::Readme(args) => args.execute(&cli.source, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
