//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`DONUTBOT_API_KEY`, `DONUTBOT_HOST`, ...)
//! 2. TOML file specified via --config CLI flag
//! 3. ./donutbot.toml in the current directory
//! 4. $XDG_CONFIG_HOME/donutbot/donutbot.toml (or ~/.config/donutbot/donutbot.toml)
//!
//! A missing file or a config without an API key / host is a startup error.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod defaults;
mod env;
mod init;
mod sources;
mod types;

pub use init::{config_root_dir, default_global_config_path, initialize_default_global_config};
pub use types::{
    ApiConfig, AutomationConfig, Config, ConfigInitResult, DisplayConfig, WorldConfig,
};

use env::apply_env_overrides;
use sources::{read_config_text_with_sources, ConfigSource};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path_override, |_| {})
}

/// Like [`load_config`], applying CLI `overrides` before validation.
pub fn load_config_with(
    path_override: Option<&str>,
    overrides: impl FnOnce(&mut Config),
) -> Result<Config, ConfigError> {
    let mut config = read_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )?;
    overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let config = read_config_from_sources(path_override, read_file, env_lookup, config_root)?;
    validate(&config)?;
    Ok(config)
}

/// Parse the highest-precedence config file and apply env overrides.
fn read_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    match &source {
        ConfigSource::Explicit(path) | ConfigSource::Global(path) => {
            tracing::debug!(path = %path.display(), "loaded config");
        }
        ConfigSource::Local => tracing::debug!("loaded config from ./donutbot.toml"),
    }
    let mut config: Config = toml::from_str(&config_text)?;
    apply_env_overrides(&mut config, &env_lookup)?;
    Ok(config)
}

/// Reject configs the controller cannot run with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.key.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "api.key is required (or set DONUTBOT_API_KEY)".to_string(),
        ));
    }
    if config.world.host.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "world.host is required (or set DONUTBOT_HOST)".to_string(),
        ));
    }
    if config.world.agent_addr.trim().is_empty() {
        return Err(ConfigError::Invalid("world.agent_addr must not be empty".to_string()));
    }

    let automation = &config.automation;
    if automation.poll_interval_ms == 0 || automation.spam_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "automation intervals must be greater than zero".to_string(),
        ));
    }
    if automation.spam_burst_ms < automation.spam_interval_ms {
        return Err(ConfigError::Invalid(
            "automation.spam_burst_ms must be at least spam_interval_ms".to_string(),
        ));
    }
    if automation.mine_search_radius == 0 {
        return Err(ConfigError::Invalid(
            "automation.mine_search_radius must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
