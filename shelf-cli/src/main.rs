//! media-shelf CLI
//!
//! Command-line driver for curating a personal media library: discover
//! assets, scrape companion-site metadata, merge stores, and build a
//! media-center library tree.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_frontend::PathRewrite;
use shelf_lib::{IngestOverrides, Settings};
use shelf_scraper::CrawlOptions;

use cli_types::{Cli, Commands, ConfigAction, RewriteArgs};
use commands::build::BuildOptions;
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Could not open log file: {e}");
        std::process::exit(2);
    }

    if let Err(e) = run(cli.command) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Scan {
            dir,
            kind,
            store,
            studio,
            model,
            code_prefix,
        } => {
            let overrides = IngestOverrides {
                studio,
                model,
                code_prefix,
            };
            commands::scan::run_scan(&dir, kind.into(), &store, overrides)
        }
        Commands::Merge {
            base,
            addition,
            out,
            insert_unmatched,
        } => commands::merge::run_merge(&base, &addition, out.as_deref(), insert_unmatched),
        Commands::Scrape {
            website,
            category,
            kind,
            prefixes,
            max_pages,
            store,
            no_log,
        } => {
            let settings = Settings::load_default()?;
            let mut options = CrawlOptions::new(website, category, kind.into());
            options.prefixes = prefixes;
            options.max_pages = max_pages;
            commands::scrape::run_scrape(&settings, &options, &store, no_log)
        }
        Commands::Build {
            store,
            out,
            kind,
            overwrite,
            rewrite,
            report,
            offline,
        } => {
            let settings = Settings::load_default()?;
            let options = BuildOptions {
                overwrite,
                rewrite: rewrite_from_flags(rewrite),
                report: report.as_deref(),
                offline,
            };
            commands::build::run_build(&settings, &store, &out, kind.into(), options)
        }
        Commands::Check { store, kind } => commands::check::run_check(&store, kind.into()),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
    }
}

/// CLI rewrite pair, if both ends were given.
fn rewrite_from_flags(args: RewriteArgs) -> Option<PathRewrite> {
    match (args.rewrite_from, args.rewrite_to) {
        (Some(from), Some(to)) if !from.is_empty() => Some(PathRewrite::new(from, to)),
        _ => None,
    }
}
