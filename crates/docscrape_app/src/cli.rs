use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docscrape_core::SourceKind;

pub const DEFAULT_CONFIG_FILE: &str = "docscrape.ron";

#[derive(Debug, Parser)]
#[command(name = "docscrape")]
#[command(about = "Drive the docs-scraping backend: sign in, scrape, export", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend origin, overrides the config file
    #[arg(long, global = true, env = "DOCSCRAPE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Config file to read
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the backend answers
    Health,

    /// List the known sources and their routes
    Sources,

    /// Open the login browser and confirm the session
    Login,

    /// Scrape one page or category
    Scrape(ScrapeArgs),

    /// Create or print the config file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Source kind, e.g. `isams-support` or `odoo-docs`
    #[arg(long, short)]
    pub source: SourceKind,

    /// Page or category URL to scrape
    #[arg(long, short)]
    pub url: String,

    /// Export to this directory instead of printing to stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Export to the configured output directory
    #[arg(long, conflicts_with = "out")]
    pub save: bool,

    /// Scrape a credentialed source without signing in first
    #[arg(long)]
    pub no_session_gate: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the default config file
    #[arg(long, required_unless_present = "show", conflicts_with = "show")]
    pub init: bool,

    /// Print the effective config
    #[arg(long)]
    pub show: bool,

    /// Overwrite an existing file with `--init`
    #[arg(long, requires = "init", conflicts_with = "show")]
    pub force: bool,
}
