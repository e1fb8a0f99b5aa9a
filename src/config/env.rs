//! Environment variable overrides.
//!
//! `DONUTBOT_*` variables win over file values so secrets can stay out of the
//! config file.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_API_KEY: &str = "DONUTBOT_API_KEY";
pub(super) const ENV_API_BASE_URL: &str = "DONUTBOT_API_BASE_URL";
pub(super) const ENV_HOST: &str = "DONUTBOT_HOST";
pub(super) const ENV_AGENT_ADDR: &str = "DONUTBOT_AGENT_ADDR";
pub(super) const ENV_USERNAME: &str = "DONUTBOT_USERNAME";
pub(super) const ENV_API_TIMEOUT_SECS: &str = "DONUTBOT_API_TIMEOUT_SECS";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(env_lookup, ENV_API_KEY) {
        config.api.key = key;
    }
    if let Some(url) = non_empty(env_lookup, ENV_API_BASE_URL) {
        config.api.base_url = url;
    }
    if let Some(host) = non_empty(env_lookup, ENV_HOST) {
        config.world.host = host;
    }
    if let Some(addr) = non_empty(env_lookup, ENV_AGENT_ADDR) {
        config.world.agent_addr = addr;
    }
    if let Some(username) = non_empty(env_lookup, ENV_USERNAME) {
        config.world.username = username;
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_API_TIMEOUT_SECS) {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_API_TIMEOUT_SECS} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.api.timeout_secs = parsed.max(1);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
