use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;
use vitrine_domain::config::VitrineConfig;

/// Prefix for environment overrides (`VITRINE__CACHE__QUOTA_BYTES`).
pub const ENV_PREFIX: &str = "VITRINE";
/// Config file looked up when no path is given (any supported extension).
pub const DEFAULT_CONFIG_FILE: &str = "vitrine";

/// Custom error type for config loading.
#[vitrine_derive::vitrine_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    #[hint("Check the config file syntax and VITRINE__* environment variables")]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Base File**: settings from `path`. An explicit path must exist; without one, an
///    optional `vitrine.{toml,json,yaml}` in the working directory is used when present.
/// 2. **Environment Overrides**: variables prefixed with `VITRINE__`, nested with double
///    underscores (`VITRINE__REMOTE__URL` maps to `remote.url`).
///
/// # Errors
/// * The explicitly requested file cannot be found or parsed.
/// * The merged values do not match the structure of `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the workspace [`VitrineConfig`]; every missing key falls back to its default.
///
/// # Errors
/// See [`load_config`].
pub fn load_vitrine_config(path: Option<impl AsRef<Path>>) -> Result<VitrineConfig, ConfigError> {
    load_config(path)
}
