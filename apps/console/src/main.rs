#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{cache, content, translations};
use crate::models::args::{CacheAction, Cli, Commands, TranslationAction};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use vitrine::ContentService;
use vitrine::kernel::config::load_vitrine_config;
use vitrine_logger::Logger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_vitrine_config(cli.config.as_deref())
        .map_err(|err| with_hint(&err, err.hint()))
        .context("Critical: Configuration is malformed")?;
    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &config.logging, cli.verbose)?;

    let service = if cli.offline {
        ContentService::offline(&config)
    } else {
        ContentService::connect(&config).await
    }
    .map_err(|err| with_hint(&err, err.hint()))?;

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Resolve { domain, lang, explain } => {
            content::resolve(&service, &mut out, &domain, lang, explain).await?;
        },
        Commands::Save { domain, lang, file, attempts, local_only } => {
            content::save(&service, &mut out, &domain, lang, &file, attempts, local_only).await?;
        },
        Commands::Reset { domain, lang } => content::reset(&service, &mut out, &domain, lang).await?,
        Commands::Preview { domain, file, lang } => {
            content::preview(&service, &mut out, &domain, lang, &file).await?;
        },
        Commands::Translations { action } => match action {
            TranslationAction::Export { lang, out: path } => {
                translations::export(&service, &mut out, lang, path.as_deref()).await?;
            },
            TranslationAction::Import { lang, file, dry_run } => {
                translations::import(&service, &mut out, lang, &file, dry_run).await?;
            },
            TranslationAction::Missing { lang, reference } => {
                translations::missing(&service, &mut out, lang, reference).await?;
            },
        },
        Commands::Cache { action } => match action {
            CacheAction::List {} => cache::list(&service, &mut out)?,
            CacheAction::Clear {} => cache::clear(&service, &mut out)?,
            CacheAction::Usage {} => cache::usage(&service, &mut out)?,
        },
    }

    Ok(())
}

fn with_hint(err: &dyn std::fmt::Display, hint: Option<&'static str>) -> anyhow::Error {
    match hint {
        Some(hint) => anyhow!("{err}\n  hint: {hint}"),
        None => anyhow!("{err}"),
    }
}
