mod app;
mod cli;
mod config;
mod effects;
mod render;

use std::io;

use anyhow::Result;
use clap::Parser;
use docscrape_logging::{scrape_info, scrape_warn, LevelFilter, LogDestination, DEFAULT_LOG_FILE};

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load(&cli.config);
    let config = loaded
        .as_ref()
        .cloned()
        .unwrap_or_default()
        .with_backend_url(cli.backend_url.clone());

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if config.log_to_file {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let destination = if config.log_to_file {
        LogDestination::Both(DEFAULT_LOG_FILE.into())
    } else {
        LogDestination::Terminal
    };
    docscrape_logging::initialize(destination, level);
    if let Err(err) = &loaded {
        scrape_warn!("{}; using defaults", err);
    }
    scrape_info!("docscrape {} backend={}", env!("CARGO_PKG_VERSION"), config.backend_url);

    match cli.command {
        Command::Sources => app::print_sources(&mut io::stdout().lock())?,
        Command::Config(args) => {
            if args.init {
                app::write_default_config(&cli.config, args.force)?;
            } else {
                print!("{}", config.to_ron()?);
                println!();
            }
        }
        Command::Health => {
            App::new(&config)?.health()?;
        }
        Command::Login => {
            App::new(&config)?.login(&mut io::stdin().lock())?;
        }
        Command::Scrape(args) => {
            App::new(&config)?.scrape(&args, &config, &mut io::stdin().lock())?;
        }
    }
    Ok(())
}
