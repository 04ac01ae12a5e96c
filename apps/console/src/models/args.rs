//! # CLI Argument Definitions
//!
//! Subcommands, arguments and global flags of the `vitrine` admin console.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vitrine::domain::{ContentDomain, LanguageCode};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Admin console for Vitrine site content")]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML); defaults to ./vitrine.* when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use an in-memory remote store instead of connecting to the database
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the effective document for a domain
    Resolve {
        #[arg(value_parser = ContentDomain::new)]
        domain: ContentDomain,
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        lang: LanguageCode,
        /// Wrap the document with the tier and language that served it
        #[arg(long)]
        explain: bool,
    },
    /// Publish a document read from a file ('-' for stdin)
    Save {
        #[arg(value_parser = ContentDomain::new)]
        domain: ContentDomain,
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        lang: LanguageCode,
        #[arg(short, long)]
        file: PathBuf,
        /// Attempts for the remote write, overriding sync.retry.max_attempts
        #[arg(long)]
        attempts: Option<u32>,
        /// Write the local cache only; the remote store is not contacted
        #[arg(long, conflicts_with = "attempts")]
        local_only: bool,
    },
    /// Overwrite a domain with its compiled-in default
    Reset {
        #[arg(value_parser = ContentDomain::new)]
        domain: ContentDomain,
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        lang: LanguageCode,
    },
    /// Show how a draft would render without publishing it
    Preview {
        #[arg(value_parser = ContentDomain::new)]
        domain: ContentDomain,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        lang: LanguageCode,
    },
    /// Bulk-edit translations as flat JSON
    Translations {
        #[command(subcommand)]
        action: TranslationAction,
    },
    /// Inspect or reset the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TranslationAction {
    /// Write the flat bundle for a language
    Export {
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        lang: LanguageCode,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace a language's translations with a flat bundle file
    Import {
        #[arg(short, long, value_parser = LanguageCode::parse)]
        lang: LanguageCode,
        #[arg(short, long)]
        file: PathBuf,
        /// Only print what would change
        #[arg(long)]
        dry_run: bool,
    },
    /// List keys present in the reference language but missing in another
    Missing {
        #[arg(short, long, value_parser = LanguageCode::parse)]
        lang: LanguageCode,
        #[arg(short, long, default_value = "ko", value_parser = LanguageCode::parse)]
        reference: LanguageCode,
    },
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// List cached (domain, language) pairs
    List {},
    /// Remove every cached entry
    Clear {},
    /// Show bytes used against the quota
    Usage {},
}
