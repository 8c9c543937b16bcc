//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use shelf_catalog::MediaKind;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Curate a personal media library: scan, scrape, merge, build", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum KindArg {
    Video,
    Album,
    Model,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => MediaKind::Video,
            KindArg::Album => MediaKind::Album,
            KindArg::Model => MediaKind::Model,
        }
    }
}

/// Source-path rewrite flags; override `[paths]` in settings.
#[derive(Args, Clone, Default)]
pub(crate) struct RewriteArgs {
    /// Path prefix to replace in recorded video paths
    #[arg(long, requires = "rewrite_to")]
    pub rewrite_from: Option<String>,

    /// Replacement for --rewrite-from
    #[arg(long, requires = "rewrite_from")]
    pub rewrite_to: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Discover media under a directory and add it to a record store
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Kind of entity to discover
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Record store (JSON) to create or update
        #[arg(short, long)]
        store: PathBuf,

        /// Studio to set on every discovered record (repeatable)
        #[arg(long)]
        studio: Vec<String>,

        /// Performer to set on every discovered record (repeatable)
        #[arg(long)]
        model: Vec<String>,

        /// Give new records without a code `<PREFIX>-NNN`
        #[arg(long)]
        code_prefix: Option<String>,
    },

    /// Merge one record store into another
    Merge {
        /// Store to merge into
        base: PathBuf,

        /// Store whose records are merged in
        addition: PathBuf,

        /// Write the result here instead of overwriting BASE
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also add records that match nothing in BASE
        #[arg(long)]
        insert_unmatched: bool,
    },

    /// Crawl a companion website and merge what it describes into a store
    Scrape {
        /// Site root including scheme (e.g. https://example.com)
        website: String,

        /// Listing path under the site root (e.g. videos)
        category: String,

        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Href prefix marking detail links on listing pages (repeatable)
        #[arg(long = "prefix", required = true)]
        prefixes: Vec<String>,

        /// Listing pages to read
        #[arg(long, default_value_t = 50)]
        max_pages: usize,

        /// Record store (JSON) to create or update
        #[arg(short, long)]
        store: PathBuf,

        /// Disable scrape log file
        #[arg(long)]
        no_log: bool,
    },

    /// Materialize a record store as a media-center library
    Build {
        /// Record store (JSON) to read
        store: PathBuf,

        /// Library root to write into
        out: PathBuf,

        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Rewrite artifacts that already exist
        #[arg(long)]
        overwrite: bool,

        #[command(flatten)]
        rewrite: RewriteArgs,

        /// Write a JSON batch report here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip downloading remote covers
        #[arg(long)]
        offline: bool,
    },

    /// List records whose template fields are not all filled in
    Check {
        /// Record store (JSON) to read
        store: PathBuf,

        #[arg(short, long, value_enum)]
        kind: KindArg,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings (file merged over defaults)
    Show,

    /// Print the settings file path
    Path,
}
